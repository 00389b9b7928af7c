use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod dispatcher;
pub mod forms;

pub use dispatcher::{DispatchStatus, DispatchTicket, ToolDispatcher};
pub use forms::FormStore;

/// Closed enumeration of the document-generation tools. The string
/// identifiers are the stable contract with the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ToolKind {
    Idea,
    Cv,
    Product,
    Market,
    Plan,
    Deck,
    FullPlan,
    Swot,
    InvestorPitch,
    Gtm,
    Finance,
    DescGen,
}

/// Lookup of an identifier outside the closed enumeration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown tool kind: {0}")]
pub struct UnknownToolKind(pub String);

impl ToolKind {
    pub const ALL: [ToolKind; 12] = [
        ToolKind::Idea,
        ToolKind::Cv,
        ToolKind::Product,
        ToolKind::Market,
        ToolKind::Plan,
        ToolKind::Deck,
        ToolKind::FullPlan,
        ToolKind::Swot,
        ToolKind::InvestorPitch,
        ToolKind::Gtm,
        ToolKind::Finance,
        ToolKind::DescGen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idea => "IDEA",
            Self::Cv => "CV",
            Self::Product => "PRODUCT",
            Self::Market => "MARKET",
            Self::Plan => "PLAN",
            Self::Deck => "DECK",
            Self::FullPlan => "FULL_PLAN",
            Self::Swot => "SWOT",
            Self::InvestorPitch => "INVESTOR_PITCH",
            Self::Gtm => "GTM",
            Self::Finance => "FINANCE",
            Self::DescGen => "DESC_GEN",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = UnknownToolKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == raw)
            .ok_or_else(|| UnknownToolKind(raw.to_string()))
    }
}

/// Immutable catalog entry for one tool. Defined once at process start.
#[derive(Debug, Clone, Copy)]
pub struct ToolDescriptor {
    pub kind: ToolKind,
    pub title: &'static str,
    pub description: &'static str,
    pub detailed_info: &'static str,
    pub expected_output: &'static str,
    pub ai_logic: &'static str,
    pub icon: &'static str,
}

// The catalog ships six cards in this fixed order; the remaining kinds keep
// form records and dispatch support but no card, as the product shipped.
static CATALOG: [ToolDescriptor; 6] = [
    ToolDescriptor {
        kind: ToolKind::FullPlan,
        title: "معماري خطة العمل الشاملة",
        description: "ولّد وثيقة استراتيجية متكاملة تشمل الملخص التنفيذي، تحليل السوق، والتوقعات المالية.",
        detailed_info: "محرك التوليد يحلل جوهر فكرتك ليصيغ الملخص التنفيذي، تحليل السوق المالي، وتوقعات النمو بنظام مكاتب الاستشارات العالمية.",
        expected_output: "خطة عمل متكاملة مقسمة (Executive Summary, Market Analysis, Projections).",
        ai_logic: "Sequoia & McKinsey Frameworks",
        icon: "🏛️",
    },
    ToolDescriptor {
        kind: ToolKind::DescGen,
        title: "مولد وصف المشروع الذكي",
        description: "حوّل ميزات مشروعك إلى وصف استراتيجي مقنع وجاذب للمستثمرين.",
        detailed_info: "صياغة نصوص ترويجية احترافية توضح القيمة المضافة ونموذج الحل المقترح.",
        expected_output: "وصف مشروع استراتيجي (Pitch Summary).",
        ai_logic: "Strategic Copywriting",
        icon: "✍️",
    },
    ToolDescriptor {
        kind: ToolKind::Gtm,
        title: "معماري استراتيجية النمو (GTM)",
        description: "صمم خطة الوصول للسوق واختراق الشرائح المستهدفة.",
        detailed_info: "تحليل قنوات الاستحواذ، تسعير المنتج، وتحديد الرسائل التسويقية الجوهرية.",
        expected_output: "خطة Go-to-Market شاملة.",
        ai_logic: "Growth Marketing Patterns",
        icon: "🚀",
    },
    ToolDescriptor {
        kind: ToolKind::Swot,
        title: "محلل SWOT الاستراتيجي",
        description: "احصل على تحليل معمق لنقاط القوة والضعف والفرص والتهديدات.",
        detailed_info: "رؤية نقدية من منظور مستثمر جريء لكشف الثغرات التشغيلية والفرص الخفية.",
        expected_output: "مصفوفة SWOT مع توصيات معالجة المخاطر.",
        ai_logic: "Venture Capital Feasibility Model",
        icon: "📈",
    },
    ToolDescriptor {
        kind: ToolKind::Market,
        title: "محرك تحليل السوق",
        description: "احصل على تحليل عميق للمنافسين والاتجاهات لقطاعك المستهدف.",
        detailed_info: "مسح شامل لبيانات السوق العالمية لتحديد حجم الفرصة (TAM) والمنافسين المباشرين.",
        expected_output: "تقرير استخبارات سوقي متكامل.",
        ai_logic: "Deep Trend Scanning",
        icon: "🌍",
    },
    ToolDescriptor {
        kind: ToolKind::Idea,
        title: "مولد الأفكار الابتكارية",
        description: "استخرج أفكاراً لمشاريع ناشئة بناءً على شغفك واتجاهات السوق.",
        detailed_info: "يحلل المحرك تقاطعات مهاراتك مع الفجوات في السوق.",
        expected_output: "تقرير يحتوي على ٣ أفكار فريدة.",
        ai_logic: "Blue Ocean Strategy",
        icon: "💡",
    },
];

/// Catalog cards in their fixed compiled-in order.
pub fn list() -> &'static [ToolDescriptor] {
    &CATALOG
}

/// Descriptor for one kind. Kinds without a catalog card fall back to a
/// minimal descriptor carrying only the stable identifier.
pub fn describe(kind: ToolKind) -> ToolDescriptor {
    CATALOG
        .iter()
        .copied()
        .find(|descriptor| descriptor.kind == kind)
        .unwrap_or(ToolDescriptor {
            kind,
            title: "",
            description: "",
            detailed_info: "",
            expected_output: "",
            ai_logic: "",
            icon: "",
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_round_trip_for_every_kind() {
        for kind in ToolKind::ALL {
            let parsed: ToolKind = kind.as_str().parse().expect("identifier should parse");
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn parsing_an_unknown_identifier_fails() {
        let err = "ROADMAP".parse::<ToolKind>().expect_err("should be rejected");
        assert_eq!(err, UnknownToolKind("ROADMAP".to_string()));
    }

    #[test]
    fn catalog_order_is_stable() {
        let kinds: Vec<ToolKind> = list().iter().map(|descriptor| descriptor.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ToolKind::FullPlan,
                ToolKind::DescGen,
                ToolKind::Gtm,
                ToolKind::Swot,
                ToolKind::Market,
                ToolKind::Idea,
            ]
        );
    }

    #[test]
    fn every_catalog_card_carries_its_copy() {
        for descriptor in list() {
            assert!(!descriptor.title.is_empty());
            assert!(!descriptor.description.is_empty());
            assert!(!descriptor.ai_logic.is_empty());
        }
    }
}
