use serde::Deserialize;

/// One classroom post/session row from the source CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassroomRecord {
    pub helpful_post: f64,
    pub nice_code_post: f64,
    pub collaborative_post: f64,
    pub confused_post: f64,
    pub creative_post: f64,
    pub bad_post: f64,
    pub amazing_post: f64,
    pub timeonline: f64,
    #[serde(rename = "Approved")]
    pub approved: String,
    pub sk1_classroom: String,
    pub sk2_classroom: String,
    pub sk3_classroom: String,
    pub sk4_classroom: String,
}

/// The loaded dataset. Built once at startup and read-only afterwards;
/// every page controller borrows it, nothing mutates it.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<ClassroomRecord>,
}

impl Dataset {
    pub fn new(records: Vec<ClassroomRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ClassroomRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn post_values(&self, post: PostType) -> Vec<f64> {
        self.records.iter().map(|r| post.value(r)).collect()
    }

    /// Observed (min, max) of `timeonline`, or None on an empty dataset.
    pub fn time_bounds(&self) -> Option<(f64, f64)> {
        let mut times = self.records.iter().map(|r| r.timeonline);
        let first = times.next()?;
        let bounds = times.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
        Some(bounds)
    }
}

/// Accessors for every numeric column, in heatmap display order.
pub const NUMERIC_COLUMNS: [(&str, fn(&ClassroomRecord) -> f64); 8] = [
    ("helpful_post", |r| r.helpful_post),
    ("nice_code_post", |r| r.nice_code_post),
    ("collaborative_post", |r| r.collaborative_post),
    ("confused_post", |r| r.confused_post),
    ("creative_post", |r| r.creative_post),
    ("bad_post", |r| r.bad_post),
    ("amazing_post", |r| r.amazing_post),
    ("timeonline", |r| r.timeonline),
];

/// The seven post-type categories selectable on the Overview page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostType {
    Helpful,
    NiceCode,
    Collaborative,
    Confused,
    Creative,
    Bad,
    Amazing,
}

impl PostType {
    pub const ALL: [PostType; 7] = [
        PostType::Helpful,
        PostType::NiceCode,
        PostType::Collaborative,
        PostType::Confused,
        PostType::Creative,
        PostType::Bad,
        PostType::Amazing,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            PostType::Helpful => "helpful_post",
            PostType::NiceCode => "nice_code_post",
            PostType::Collaborative => "collaborative_post",
            PostType::Confused => "confused_post",
            PostType::Creative => "creative_post",
            PostType::Bad => "bad_post",
            PostType::Amazing => "amazing_post",
        }
    }

    pub fn value(self, record: &ClassroomRecord) -> f64 {
        match self {
            PostType::Helpful => record.helpful_post,
            PostType::NiceCode => record.nice_code_post,
            PostType::Collaborative => record.collaborative_post,
            PostType::Confused => record.confused_post,
            PostType::Creative => record.creative_post,
            PostType::Bad => record.bad_post,
            PostType::Amazing => record.amazing_post,
        }
    }
}

/// The four skill-rating columns selectable on the Skills page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillColumn {
    Sk1,
    Sk2,
    Sk3,
    Sk4,
}

impl SkillColumn {
    pub const ALL: [SkillColumn; 4] = [
        SkillColumn::Sk1,
        SkillColumn::Sk2,
        SkillColumn::Sk3,
        SkillColumn::Sk4,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            SkillColumn::Sk1 => "sk1_classroom",
            SkillColumn::Sk2 => "sk2_classroom",
            SkillColumn::Sk3 => "sk3_classroom",
            SkillColumn::Sk4 => "sk4_classroom",
        }
    }

    pub fn cell(self, record: &ClassroomRecord) -> &str {
        match self {
            SkillColumn::Sk1 => &record.sk1_classroom,
            SkillColumn::Sk2 => &record.sk2_classroom,
            SkillColumn::Sk3 => &record.sk3_classroom,
            SkillColumn::Sk4 => &record.sk4_classroom,
        }
    }
}

#[cfg(test)]
pub fn sample_record(timeonline: f64, approved: &str, sk1: &str) -> ClassroomRecord {
    ClassroomRecord {
        helpful_post: 0.0,
        nice_code_post: 0.0,
        collaborative_post: 0.0,
        confused_post: 0.0,
        creative_post: 0.0,
        bad_post: 0.0,
        amazing_post: 0.0,
        timeonline,
        approved: approved.to_string(),
        sk1_classroom: sk1.to_string(),
        sk2_classroom: "1".to_string(),
        sk3_classroom: "1".to_string(),
        sk4_classroom: "1".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_bounds_cover_min_and_max() {
        let data = Dataset::new(vec![
            sample_record(30.0, "yes", "1"),
            sample_record(10.0, "no", "1"),
            sample_record(20.0, "yes", "1"),
        ]);
        assert_eq!(data.time_bounds(), Some((10.0, 30.0)));
    }

    #[test]
    fn time_bounds_empty_dataset() {
        let data = Dataset::new(Vec::new());
        assert_eq!(data.time_bounds(), None);
    }

    #[test]
    fn post_type_names_match_csv_columns() {
        let names: Vec<&str> = PostType::ALL.iter().map(|p| p.column_name()).collect();
        assert_eq!(
            names,
            vec![
                "helpful_post",
                "nice_code_post",
                "collaborative_post",
                "confused_post",
                "creative_post",
                "bad_post",
                "amazing_post"
            ]
        );
    }
}
