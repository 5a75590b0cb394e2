use super::super::domain::{ExpertisePreference, ExpertiseTarget, ReviewTask};

/// Points for an exact product-id preference.
pub const PRODUCT_MATCH_POINTS: u32 = 100;
/// Points for a company preference matching the task's company.
pub const COMPANY_MATCH_POINTS: u32 = 50;
/// Points for a category preference matching the task's category.
pub const CATEGORY_MATCH_POINTS: u32 = 10;
/// Bonus for a reviewer already holding a same-category task in this run.
pub const CONTINUITY_BONUS: u32 = 5;

/// Affinity between one task and one reviewer's declared expertise.
///
/// Each tier fires at most once regardless of how many preferences hit it;
/// matching tiers sum. Pure: workload is never consulted here.
pub fn match_score(task: &ReviewTask, preferences: &[ExpertisePreference]) -> u32 {
    let task_company = normalize_label(&task.company);
    let task_category = normalize_label(&task.category);

    let mut product_hit = false;
    let mut company_hit = false;
    let mut category_hit = false;

    for preference in preferences {
        match &preference.target {
            ExpertiseTarget::Product(id) => {
                product_hit |= *id == task.id;
            }
            ExpertiseTarget::Company(company) => {
                company_hit |=
                    !task_company.is_empty() && normalize_label(company) == task_company;
            }
            ExpertiseTarget::Category(category) => {
                category_hit |=
                    !task_category.is_empty() && normalize_label(category) == task_category;
            }
        }
    }

    let mut score = 0;
    if product_hit {
        score += PRODUCT_MATCH_POINTS;
    }
    if company_hit {
        score += COMPANY_MATCH_POINTS;
    }
    if category_hit {
        score += CATEGORY_MATCH_POINTS;
    }
    score
}

/// Comparison key for company/category labels: strips zero-width characters,
/// collapses whitespace, and lowercases, so "Path AI" and " pathai" do not
/// silently diverge when one side came from a hand-edited record.
pub(crate) fn normalize_label(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}
