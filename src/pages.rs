use crate::charts::{self, Chart, Palette};
use crate::models::{ClassroomRecord, Dataset, PostType, SkillColumn};
use crate::normalize::{self, RatingParseError};
use crate::stats;

/// The four navigable pages, in sidebar order.
pub const PAGE_NAMES: [&str; 4] = [
    "Overview",
    "Time and Approval",
    "Skills",
    "Correlation Analysis",
];

/// Per-page selections, owned by the UI layer and handed to the stateless
/// controllers on every invocation.
#[derive(Debug, Clone)]
pub struct ViewParams {
    pub post_type: PostType,
    pub skill: SkillColumn,
    pub time_range: (f64, f64),
}

impl ViewParams {
    /// Defaults mirror the dashboard's initial controls: first post type,
    /// first skill, the full observed time range.
    pub fn initial(data: &Dataset) -> Self {
        let time_range = data.time_bounds().unwrap_or((0.0, 0.0));
        Self {
            post_type: PostType::Helpful,
            skill: SkillColumn::Sk1,
            time_range,
        }
    }
}

/// Everything one page renders: a heading, a short intro, and its charts.
/// A failed skill parse surfaces here as an error message in place of charts.
#[derive(Debug, Clone)]
pub struct PageView {
    pub title: String,
    pub intro: String,
    pub charts: Vec<Chart>,
    pub error: Option<String>,
}

impl PageView {
    fn new(title: &str, intro: &str, charts: Vec<Chart>) -> Self {
        Self {
            title: title.to_string(),
            intro: intro.to_string(),
            charts,
            error: None,
        }
    }
}

/// Map a page name to its controller. Unrecognized names render nothing;
/// whether that should instead be an error page is an open call, recorded
/// in DESIGN.md.
pub fn dispatch(data: &Dataset, page_name: &str, params: &ViewParams) -> Option<PageView> {
    match page_name {
        "Overview" => Some(overview(data, params.post_type)),
        "Time and Approval" => {
            let (low, high) = params.time_range;
            Some(time_approval(data, low, high))
        }
        "Skills" => Some(match skills(data, params.skill) {
            Ok(view) => view,
            Err(err) => PageView {
                title: "Skill Assessments Overview".to_string(),
                intro: String::new(),
                charts: Vec::new(),
                error: Some(err.to_string()),
            },
        }),
        "Correlation Analysis" => Some(correlation(data)),
        _ => None,
    }
}

/// Distribution of one post-type column's raw per-row values.
pub fn overview(data: &Dataset, post: PostType) -> PageView {
    let series = data.post_values(post);
    let chart = charts::render_distribution(
        &series,
        &format!("Distribution of {}", post.column_name()),
        post.column_name(),
        true,
    );
    PageView::new(
        "Overview of Student Posts",
        "Explore the different types of posts by students in the classroom.",
        vec![chart],
    )
}

/// Rows whose `timeonline` falls inside the inclusive range.
pub fn filter_by_time(data: &Dataset, low: f64, high: f64) -> Vec<&ClassroomRecord> {
    data.records()
        .iter()
        .filter(|r| r.timeonline >= low && r.timeonline <= high)
        .collect()
}

/// Time histogram plus approval counts, both restricted to the selected
/// range. An empty subset renders two empty charts.
pub fn time_approval(data: &Dataset, low: f64, high: f64) -> PageView {
    let filtered = filter_by_time(data, low, high);
    let times: Vec<f64> = filtered.iter().map(|r| r.timeonline).collect();
    let approvals: Vec<&str> = filtered.iter().map(|r| r.approved.as_str()).collect();

    let time_chart = charts::render_distribution(&times, "Time Spent Online", "timeonline", false);
    let approval_chart = charts::render_category_counts(
        &stats::label_counts(&approvals),
        "Approval Rates",
        "Approved",
        Palette::Viridis,
    );

    PageView::new(
        "Time Online and Approval Rates",
        "Visualize how much time students are spending online and their approval rates.",
        vec![time_chart, approval_chart],
    )
}

/// Flattened rating counts for one skill column. Parse failures stay local
/// to this page.
pub fn skills(data: &Dataset, skill: SkillColumn) -> Result<PageView, RatingParseError> {
    let ratings = normalize::flatten_ratings(data, skill)?;
    let counts: Vec<(String, usize)> = stats::rating_counts(&ratings)
        .into_iter()
        .map(|(rating, count)| (rating.to_string(), count))
        .collect();
    let chart = charts::render_category_counts(
        &counts,
        &format!("Distribution of Ratings in {}", skill.column_name()),
        "Ratings",
        Palette::Cubehelix,
    );
    Ok(PageView::new(
        "Skill Assessments Overview",
        "Review the distribution of skill ratings across different classroom skills.",
        vec![chart],
    ))
}

/// Full-dataset correlation heatmap; takes no user parameters.
pub fn correlation(data: &Dataset) -> PageView {
    let chart = charts::render_correlation_heatmap(data, "Correlation Matrix");
    PageView::new(
        "Correlation Analysis",
        "Examine the correlation between numerical variables to identify relationships.",
        vec![chart],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_record;

    fn time_approval_dataset() -> Dataset {
        Dataset::new(vec![
            sample_record(10.0, "yes", "3,4"),
            sample_record(20.0, "no", "2"),
            sample_record(30.0, "yes", "4,4,1"),
            sample_record(40.0, "no", "5"),
        ])
    }

    #[test]
    fn time_filter_is_inclusive_of_both_bounds() {
        let data = time_approval_dataset();
        let filtered = filter_by_time(&data, 20.0, 30.0);
        let times: Vec<f64> = filtered.iter().map(|r| r.timeonline).collect();
        assert_eq!(times, vec![20.0, 30.0]);
    }

    #[test]
    fn disjoint_range_yields_empty_subset() {
        let data = time_approval_dataset();
        assert!(filter_by_time(&data, 50.0, 90.0).is_empty());
        assert!(filter_by_time(&data, 0.0, 5.0).is_empty());
    }

    #[test]
    fn time_approval_counts_within_range() {
        let data = time_approval_dataset();
        let view = time_approval(&data, 15.0, 35.0);
        assert_eq!(view.charts.len(), 2);
        match &view.charts[1] {
            Chart::CategoryCounts { bars, .. } => {
                assert_eq!(bars.len(), 2);
                assert_eq!((bars[0].label.as_str(), bars[0].count), ("no", 1));
                assert_eq!((bars[1].label.as_str(), bars[1].count), ("yes", 1));
            }
            other => panic!("expected approval counts, got {other:?}"),
        }
    }

    #[test]
    fn time_approval_empty_range_renders_empty_charts() {
        let data = time_approval_dataset();
        let view = time_approval(&data, 500.0, 600.0);
        match &view.charts[0] {
            Chart::Histogram { bins, .. } => assert!(bins.is_empty()),
            other => panic!("expected time histogram, got {other:?}"),
        }
        match &view.charts[1] {
            Chart::CategoryCounts { bars, .. } => assert!(bars.is_empty()),
            other => panic!("expected approval counts, got {other:?}"),
        }
    }

    #[test]
    fn skills_page_counts_flattened_ratings() {
        let data = time_approval_dataset();
        let view = skills(&data, SkillColumn::Sk1).unwrap();
        match &view.charts[0] {
            Chart::CategoryCounts { bars, .. } => {
                let counts: Vec<(&str, usize)> = bars
                    .iter()
                    .map(|b| (b.label.as_str(), b.count))
                    .collect();
                assert_eq!(counts, vec![("1", 1), ("2", 1), ("3", 1), ("4", 3), ("5", 1)]);
            }
            other => panic!("expected rating counts, got {other:?}"),
        }
    }

    #[test]
    fn skills_parse_error_stays_local_to_the_page() {
        let data = Dataset::new(vec![sample_record(10.0, "yes", "3,oops")]);
        let params = ViewParams::initial(&data);
        let view = dispatch(&data, "Skills", &params).unwrap();
        assert!(view.charts.is_empty());
        assert!(view.error.as_deref().unwrap().contains("oops"));
        // Other pages keep working against the same dataset.
        assert!(dispatch(&data, "Overview", &params).is_some());
    }

    #[test]
    fn dispatch_reaches_all_four_pages() {
        let data = time_approval_dataset();
        let params = ViewParams::initial(&data);
        for name in PAGE_NAMES {
            let view = dispatch(&data, name, &params).unwrap();
            assert!(!view.title.is_empty());
        }
    }

    #[test]
    fn unknown_page_renders_nothing() {
        let data = time_approval_dataset();
        let params = ViewParams::initial(&data);
        assert!(dispatch(&data, "Leaderboard", &params).is_none());
        assert!(dispatch(&data, "", &params).is_none());
    }

    #[test]
    fn initial_params_span_the_full_time_range() {
        let data = time_approval_dataset();
        let params = ViewParams::initial(&data);
        assert_eq!(params.time_range, (10.0, 40.0));
    }
}
