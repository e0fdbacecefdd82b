use super::enums::ActivityCategory;

const ENVIRONMENT_KEYWORDS: &[&str] = &[
    "环保", "环境保护", "垃圾分类", "植树", "绿化", "清洁", "捡垃圾", "保护地球", "绿色", "生态",
    "可持续发展", "低碳", "节能",
];

const EDUCATION_KEYWORDS: &[&str] = &["教育", "教学", "辅导", "支教", "培训", "学习", "读书", "知识"];

const COMMUNITY_KEYWORDS: &[&str] = &[
    "社区", "敬老院", "养老院", "孤儿院", "福利", "关爱", "陪伴", "帮助", "服务", "志愿", "公益",
];

const MEDICAL_KEYWORDS: &[&str] = &["医疗", "医院", "健康", "献血", "义诊", "救助", "护理"];

const ANIMAL_WELFARE_KEYWORDS: &[&str] = &["动物", "流浪动物", "救助", "宠物", "保护", "关爱动物"];

/// Ordered category → keyword table.
///
/// Order is priority: when text mentions several domains, the first entry
/// with any keyword hit wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLexicon {
    entries: Vec<(ActivityCategory, Vec<String>)>,
}

impl CategoryLexicon {
    pub fn new(entries: Vec<(ActivityCategory, Vec<String>)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(category, keywords)| {
                let keywords = keywords
                    .into_iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (category, keywords)
            })
            .collect();
        Self { entries }
    }

    /// Table scanned by the rule engine: environment, education,
    /// community service, medical.
    pub fn rule_based() -> Self {
        Self::from_static(&[
            (ActivityCategory::Environment, ENVIRONMENT_KEYWORDS),
            (ActivityCategory::Education, EDUCATION_KEYWORDS),
            (ActivityCategory::CommunityService, COMMUNITY_KEYWORDS),
            (ActivityCategory::Medical, MEDICAL_KEYWORDS),
        ])
    }

    /// Table used on remote-model output; adds animal welfare and 图书馆.
    pub fn remote_inference() -> Self {
        let mut lexicon = Self::rule_based();
        if let Some((_, education)) = lexicon
            .entries
            .iter_mut()
            .find(|(c, _)| *c == ActivityCategory::Education)
        {
            education.push("图书馆".to_string());
        }
        lexicon.entries.push((
            ActivityCategory::AnimalWelfare,
            ANIMAL_WELFARE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        ));
        lexicon
    }

    fn from_static(table: &[(ActivityCategory, &[&str])]) -> Self {
        Self::new(
            table
                .iter()
                .map(|(c, words)| (*c, words.iter().map(|w| w.to_string()).collect()))
                .collect(),
        )
    }

    /// First category (in priority order) with a keyword contained in `text`.
    pub fn scan(&self, text: &str) -> Option<ActivityCategory> {
        let lower = text.to_lowercase();
        self.entries
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k.as_str())))
            .map(|(category, _)| *category)
    }

    pub fn categories(&self) -> impl Iterator<Item = ActivityCategory> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    /// Every keyword, in table order, for registering with the segmenter.
    pub fn keywords(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .flat_map(|(_, keywords)| keywords.iter().map(String::as_str))
    }
}
