//! Water-education knowledge base.
//!
//! Curated explainer content the assistant may quote verbatim. The
//! language model is instructed to answer educational questions from
//! this content only, so everything a customer may be told lives here.

use crate::constants::conversation::EDUCATION_TOPIC_LIMIT;

/// One explainer topic with its lookup keywords.
#[derive(Debug, Clone)]
pub struct EducationTopic {
    /// Stable identifier, used to track topics already covered.
    pub id: &'static str,
    /// Human-readable title.
    pub title: &'static str,
    /// Lowercase keywords that select this topic.
    keywords: &'static [&'static str],
    /// Explainer body.
    pub content: &'static str,
}

/// Return topics whose keywords occur in the query, capped to avoid
/// overwhelming a single reply.
pub fn matching_topics(query: &str) -> Vec<&'static EducationTopic> {
    let lower = query.to_lowercase();
    TOPICS
        .iter()
        .filter(|topic| topic.keywords.iter().any(|k| lower.contains(k)))
        .take(EDUCATION_TOPIC_LIMIT)
        .collect()
}

/// Render topics into the education section of a prompt payload.
pub fn render_topics(topics: &[&EducationTopic]) -> String {
    topics
        .iter()
        .map(|topic| format!("{}\n{}", topic.title, topic.content))
        .collect::<Vec<_>>()
        .join("\n\n==================================================\n\n")
}

pub const TOPICS: &[EducationTopic] = &[
    EducationTopic {
        id: "alkaline_water",
        title: "Alkaline Water Benefits",
        keywords: &["alkaline", "ionized", "antioxidant"],
        content: "\
Alkaline water sits at pH 8.5-9.5, against 6.5-7.5 for regular drinking water. \
It is produced by ionization, which raises pH and adds minerals such as \
calcium, magnesium, and potassium. Reported benefits include easier hydration, \
antioxidant properties that help neutralize free radicals, support for the \
body's pH balance, and improved mineral absorption. Start with one or two \
glasses daily and increase gradually; it is best consumed about 30 minutes \
before meals. It is not recommended for people with kidney disease, and anyone \
on medication should consult a doctor first. Sources include natural spring \
water from alkaline rock, alkaline ionizer stages on RO systems, and mineral \
cartridges added to filtered water.",
    },
    EducationTopic {
        id: "tds_information",
        title: "TDS (Total Dissolved Solids) Guide",
        keywords: &["tds", "total dissolved solids", "dissolved", "ppm", "minerals"],
        content: "\
TDS measures dissolved minerals, salts, and metals in water, in parts per \
million. As a guide: 0-50 ppm is excellent but may lack essential minerals, \
50-150 ppm is ideal for drinking, 150-300 ppm is acceptable, 300-500 ppm needs \
treatment, and above 500 ppm requires purification. Water in the 50-150 ppm \
band still carries calcium for bones, magnesium for heart function, and \
potassium for muscles. RO reduces TDS sharply and can go too low on its own; a \
TDS controller or mineralizer stage restores essential minerals, while UV and \
UF preserve natural TDS levels. Typical solutions are RO with a TDS \
controller, alkaline and mineral cartridges, and TDS monitoring.",
    },
    EducationTopic {
        id: "ro_vs_uv_uf",
        title: "RO vs UV vs UF Technology Comparison",
        keywords: &[
            "ro vs uv",
            "reverse osmosis",
            "ultraviolet",
            "ultrafiltration",
            "difference",
            "comparison",
            "technology",
        ],
        content: "\
Reverse osmosis (RO) removes heavy metals, chemicals, salts, bacteria, and \
viruses, cutting TDS by 80-95%; it is the right choice for high-TDS or \
chemically contaminated water, at the cost of also removing beneficial \
minerals and wasting some water. Ultraviolet (UV) kills bacteria, viruses, and \
other microorganisms without chemicals and retains all minerals, but does not \
remove dissolved chemicals or heavy metals. Ultrafiltration (UF) removes \
bacteria, cysts, and suspended particles, keeps essential minerals, and can \
run without electricity, but leaves dissolved salts in place. Common \
combinations: RO+UV+UF for complete protection, UV+UF for low-TDS sources, RO \
with a mineralizer to regain minerals, and a pre-filter with UV for basically \
clean supplies. Rule of thumb: TDS above 300 calls for RO; low TDS with \
bacterial risk calls for UV+UF; chemical contamination makes RO mandatory.",
    },
    EducationTopic {
        id: "water_ph_levels",
        title: "Water pH Levels and Health Impact",
        keywords: &["ph level", "ph scale", "acidic", "acidity", "basic"],
        content: "\
The pH scale runs 0-14: below 7 is acidic, 7 is neutral, above 7 is alkaline. \
The WHO standard for drinking water is 6.5-8.5, with 7.0-8.5 ideal; alkaline \
water sits at 8.5-9.5 and pure RO output at 6.0-7.0. Acidic water below 6.5 \
can taste metallic, leach metals from pipes, and erode tooth enamel. Mildly \
alkaline water hydrates well and supports mineral absorption. pH can be \
adjusted with alkaline cartridges, natural mineral stones, carbon filters \
that remove pH-affecting chlorine, and remineralization stages after RO.",
    },
    EducationTopic {
        id: "water_hardness",
        title: "Water Hardness and Softening Solutions",
        keywords: &["hard water", "hardness", "softener", "scale", "calcium", "magnesium"],
        content: "\
Hardness comes from dissolved calcium and magnesium picked up from limestone, \
chalk, and gypsum. Levels in ppm CaCO3: soft 0-75, moderately hard 75-150, \
hard 150-300, very hard above 300. Hard water causes scale in pipes and \
appliances, poor soap lathering, dry skin and hair, higher detergent use, and \
shorter appliance life. Ion-exchange softeners remove calcium and magnesium \
completely by swapping them for sodium; salt-free conditioners alter the \
mineral structure to reduce scaling without adding sodium; RO removes hardness \
minerals along with other contaminants. Softening is deployed as whole-house \
systems, point-of-use units, and commercial or industrial softening plants.",
    },
    EducationTopic {
        id: "chlorine_removal",
        title: "Chlorine in Water and Removal Methods",
        keywords: &["chlorine", "disinfection", "chemical smell", "odor", "taste"],
        content: "\
Chlorine is added to municipal supplies to disinfect them and prevent \
waterborne disease; the WHO allows up to 5 ppm and typical supplies carry \
0.2-1.0 ppm. Side effects include taste and odor complaints, skin and eye \
irritation, and the potential formation of harmful byproducts. Activated \
carbon is the most effective and economical removal method and also improves \
taste; RO removes chlorine along with other contaminants; boiling works but is \
slow. UV does not remove chlorine, though it pairs well with a carbon \
pre-filter. Typical deployments: under-sink carbon filters for the kitchen, \
whole-house carbon systems, carbon shower filters, and multi-stage purifiers \
with carbon stages for drinking water.",
    },
];
