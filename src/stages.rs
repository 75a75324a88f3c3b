/// One disease stage panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageInfo {
    /// Matches a label in `DEFAULT_LABELS`.
    pub label: &'static str,
    pub marker: &'static str,
    pub description: &'static [&'static str],
    pub actions: &'static [&'static str],
    pub link_text: &'static str,
    pub link_url: &'static str,
}

/// Reference material shown next to every prediction, in display order:
/// left column first, then right column.
///
/// This content is static; it does not depend on the model or the upload.
pub const STAGES: [StageInfo; 4] = [
    StageInfo {
        label: "Non Demented",
        marker: "🟢",
        description: &[
            "Healthy cognitive state with no symptoms",
            "Baseline for comparison in diagnosis",
            "Independent daily functioning",
        ],
        actions: &[
            "Maintain brain health with physical & mental activity",
            "Regular medical checkups",
            "Nutritious diet and low stress lifestyle",
        ],
        link_text: "Learn more about Alzheimer's stages",
        link_url: "https://www.alz.org/alzheimers-dementia/stages",
    },
    StageInfo {
        label: "Very Mild Demented",
        marker: "🟡",
        description: &[
            "Minor memory lapses (not affecting daily life)",
            "Often considered part of normal aging",
            "Detected only through testing",
        ],
        actions: &[
            "Mental stimulation (reading, puzzles, learning)",
            "Frequent social interaction",
            "Monitor for any increasing symptoms",
        ],
        link_text: "Read scientific article on early Alzheimer's",
        link_url: "https://www.ncbi.nlm.nih.gov/pmc/articles/PMC6527027/",
    },
    StageInfo {
        label: "Mild Demented",
        marker: "🟠",
        description: &[
            "Memory and thinking issues noticeable to others",
            "Problems with planning and completing tasks",
            "Difficulty remembering names and recent events",
        ],
        actions: &[
            "Consult a neurologist for evaluation",
            "Establish a treatment or care routine",
            "Start safety planning at home",
        ],
        link_text: "What is Mild Cognitive Impairment?",
        link_url: "https://www.nia.nih.gov/health/what-mild-cognitive-impairment",
    },
    StageInfo {
        label: "Moderate Demented",
        marker: "🔴",
        description: &[
            "Significant confusion and forgetfulness",
            "Help needed for dressing, eating, etc.",
            "Personality and behavior changes possible",
        ],
        actions: &[
            "24/7 care and support structure is essential",
            "Medication and therapies may slow progression",
            "Family and caregiver education crucial",
        ],
        link_text: "Moderate Alzheimer's: Mayo Clinic",
        link_url: "https://www.mayoclinic.org/diseases-conditions/alzheimers-disease/in-depth/alzheimers-stages/art-20048448",
    },
];

pub fn stage_for(label: &str) -> Option<&'static StageInfo> {
    STAGES.iter().find(|s| s.label == label)
}
