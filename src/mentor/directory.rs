/// Specialty filter chips for the expert-network tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Specialty {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

pub static SPECIALTIES: [Specialty; 6] = [
    Specialty { id: "all", label: "الكل", icon: "🎯" },
    Specialty { id: "Tech", label: "تقني", icon: "💻" },
    Specialty { id: "Finance", label: "مالي", icon: "💰" },
    Specialty { id: "Growth", label: "نمو وتسويق", icon: "📈" },
    Specialty { id: "Legal", label: "قانوني", icon: "⚖️" },
    Specialty { id: "Strategy", label: "استراتيجية", icon: "🧩" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentorProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub role: &'static str,
    pub company: &'static str,
    pub specialty: &'static str,
    pub bio: &'static str,
    pub experience_years: u8,
    pub avatar: &'static str,
    pub rating: &'static str,
}

// Placeholder roster until the live directory service lands.
pub static MENTORS: [MentorProfile; 2] = [
    MentorProfile {
        id: "m1",
        name: "د. خالد العمري",
        role: "خبير نمو الشركات الناشئة",
        company: "GrowthOps Global",
        specialty: "Growth",
        bio: "أكثر من ١٥ عاماً في مساعدة الشركات الناشئة على التوسع في الأسواق الخليجية وجذب الاستثمارات العالمية.",
        experience_years: 15,
        avatar: "👨‍💼",
        rating: "4.9",
    },
    MentorProfile {
        id: "m2",
        name: "م. سارة القحطاني",
        role: "كبير مهندسي البرمجيات",
        company: "TechFlow",
        specialty: "Tech",
        bio: "متخصصة في بناء البنية التحتية القابلة للتوسع وتطوير المنتجات الأولية (MVP).",
        experience_years: 10,
        avatar: "👩‍💻",
        rating: "4.8",
    },
];

/// Case-insensitive substring match on name and role, combined with an
/// exact specialty match ("all" matches everything).
pub fn filter(specialty: &str, query: &str) -> Vec<&'static MentorProfile> {
    let query = query.to_lowercase();
    MENTORS
        .iter()
        .filter(|mentor| {
            let specialty_matches = specialty == "all" || mentor.specialty == specialty;
            let query_matches = mentor.name.to_lowercase().contains(&query)
                || mentor.role.to_lowercase().contains(&query);
            specialty_matches && query_matches
        })
        .collect()
}
