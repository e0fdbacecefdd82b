use chrono::NaiveDate;

use crate::models::enums::ActivityCategory;
use crate::pipeline::repair::DATE_FORMAT;

/// Build the extraction prompt for one user request.
///
/// Today's date is stated explicitly so the model anchors month/day
/// inference to the same year the rule engine would use.
pub fn build_extraction_prompt(text: &str, today: NaiveDate) -> String {
    let today = today.format(DATE_FORMAT);
    let categories = ActivityCategory::CONCRETE
        .iter()
        .map(|c| format!("\"{}\"", c.as_str()))
        .collect::<Vec<_>>()
        .join("、");
    let general = ActivityCategory::General.as_str();

    format!(
        r#"你是一个志愿活动信息提取专家，请从以下用户输入中提取关键信息，并以JSON格式返回。

今天的日期：{today}

用户输入：{text}

需要提取的信息：
1. 年龄：用户的年龄（数字，如果没有则返回null）
2. 人数：参与活动的总人数（数字，默认为1）
3. 日期：希望参加活动的具体日期（格式：YYYY-MM-DD，如果没有则返回null）
4. 时间：希望参加活动的具体时间段（格式：HH:MM-HH:MM，如果没有则返回null）
5. 活动类型：希望参加的活动类型（从{categories}中选择，如果没有则返回"{general}"）

请严格按照以下JSON格式返回：
{{
    "年龄": 数字或null,
    "人数": 数字,
    "日期": "YYYY-MM-DD"或null,
    "时间": "HH:MM-HH:MM"或null,
    "活动类型": "活动类型字符串"
}}

注意：
- 如果用户说"我和朋友"，人数应该是2
- 如果用户说"4月3号"，假设年份是当前年份，如果日期已过则使用下一年
- 时间段的表达要标准化，如"上午"→"08:00-12:00"，"下午"→"14:00-18:00"，"早上"→"07:00-10:00"，"中午"→"11:00-14:00"，"晚上"→"19:00-22:00"
- 活动类型要从预定义类型中选择最接近的
- 只返回JSON，不要添加其他说明"#
    )
}
