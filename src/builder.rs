use crate::engine::Notation;
use crate::utils::DEFAULT_PARALLEL_THRESHOLD;
use crate::ChainPlanner;

pub struct ChainPlannerBuilder {
    label_prefix: Option<String>,
    operator: Option<String>,
    parallel_threshold: Option<usize>,
}

impl Default for ChainPlannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainPlannerBuilder {
    pub fn new() -> Self {
        Self {
            label_prefix: None,
            operator: None,
            parallel_threshold: None,
        }
    }
    pub fn with_label_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.label_prefix = Some(prefix.into());
        self
    }
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = Some(threshold);
        self
    }
    pub fn build(self) -> ChainPlanner {
        let defaults = Notation::default();
        let notation = Notation {
            label_prefix: self.label_prefix.unwrap_or(defaults.label_prefix),
            operator: self.operator.unwrap_or(defaults.operator),
        };
        let threshold = self
            .parallel_threshold
            .unwrap_or(DEFAULT_PARALLEL_THRESHOLD)
            .max(2);
        ChainPlanner::with_config(notation, threshold)
    }
}
