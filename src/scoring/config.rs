use tracing::debug;

/// Keyword lists, weights and thresholds driving the heuristic scorer.
///
/// Constructed once (usually from defaults, optionally biased by extracted
/// profile skills) and handed to [`ScoringEngine::new`](super::ScoringEngine::new).
/// Keyword entries may contain comma-separated alternatives; each alternative
/// compiles to its own word-boundary pattern.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Weight added per matched positive title keyword.
    pub positive_weight: i32,
    /// Weight added per matched negative title keyword (negative number).
    pub negative_weight: i32,
    /// Inclusion threshold; may be negative to admit heuristically neutral postings.
    pub threshold: i32,
    pub title_positive: Vec<String>,
    pub title_negative: Vec<String>,
    /// Description keywords with individual weights (positive numbers).
    pub description_positive: Vec<(String, i32)>,
    /// Description keywords with individual weights (negative numbers).
    pub description_negative: Vec<(String, i32)>,
    /// Minimum years mapped to penalty; only the highest threshold met applies.
    pub experience_penalties: Vec<(u32, i32)>,
    /// Cosine similarity at which the profile-skill bonus kicks in.
    pub cv_skill_boost_threshold: f32,
    /// Bonus points granted above the boost threshold.
    pub cv_skill_bonus_points: i32,
    /// Base weight for dynamically injected profile skills.
    pub dynamic_skill_weight: i32,
    /// Skills below this importance keep their baseline weight.
    pub min_importance_for_scoring: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            positive_weight: 30,
            negative_weight: -30,
            threshold: -20,
            title_positive: vec![
                "junior,jr".to_string(),
                "entry level,entry-level".to_string(),
                "graduate,yeni mezun".to_string(),
                "associate".to_string(),
                "intern,stajyer".to_string(),
            ],
            title_negative: vec![
                "senior,kıdemli".to_string(),
                "lead,team lead,tech lead".to_string(),
                "principal".to_string(),
                "manager,müdür".to_string(),
                "director,direktör".to_string(),
                "chief,head".to_string(),
                "architect".to_string(),
            ],
            description_positive: vec![
                ("sql".to_string(), 15),
                ("python".to_string(), 15),
                ("data analysis,veri analizi".to_string(), 15),
                ("project management,proje yönetimi".to_string(), 15),
                ("erp,sap".to_string(), 20),
                ("business analyst,iş analisti".to_string(), 20),
                ("javascript,typescript".to_string(), 10),
                ("react".to_string(), 10),
                ("power bi,powerbi,tableau".to_string(), 10),
                ("full stack,full-stack".to_string(), 10),
            ],
            description_negative: vec![
                ("team management,takım yönetimi".to_string(), -15),
                ("budget responsibility,bütçe yönetimi".to_string(), -15),
                ("direct reports".to_string(), -15),
                ("hiring,işe alım".to_string(), -10),
            ],
            experience_penalties: vec![(3, -10), (4, -20), (5, -40), (8, -50), (10, -60)],
            cv_skill_boost_threshold: 0.8,
            cv_skill_bonus_points: 10,
            dynamic_skill_weight: 10,
            min_importance_for_scoring: 0.75,
        }
    }
}

impl ScoringConfig {
    /// Biases description weights towards profile skills, proportional to
    /// their reported importance.
    ///
    /// Skills under `min_importance_for_scoring` are left at baseline weight;
    /// low-confidence signals should not reshape the ranking. Mismatched
    /// `skills`/`importance` lengths degrade to uniform importance.
    pub fn with_skill_importance(mut self, skills: &[String], importance: &[f32]) -> Self {
        if skills.is_empty() {
            return self;
        }

        let uniform = vec![1.0; skills.len()];
        let importance = if importance.len() == skills.len() {
            importance
        } else {
            &uniform
        };

        for (skill, &imp) in skills.iter().zip(importance) {
            if skill.trim().is_empty() {
                continue;
            }
            if imp < self.min_importance_for_scoring {
                debug!(skill, importance = imp, "skill below importance threshold");
                continue;
            }
            let weight = (self.dynamic_skill_weight as f32 * imp).round() as i32;
            debug!(skill, importance = imp, weight, "boosting profile skill");
            // Entries hold comma-separated alternatives; a skill matching
            // any alternative re-weights that entry instead of duplicating it.
            match self.description_positive.iter_mut().find(|(existing, _)| {
                existing
                    .split(',')
                    .any(|alt| alt.trim().eq_ignore_ascii_case(skill))
            }) {
                Some(entry) => entry.1 = weight,
                None => self.description_positive.push((skill.clone(), weight)),
            }
        }

        self
    }
}
