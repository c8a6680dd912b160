/// The seven fixed KPI categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    CoreSentiment,
    Positivity,
    Negativity,
    IntensityRisk,
    TopicsAspects,
    VolumeCoverage,
    PredictiveAnalysis,
}

/// Where a category card takes its headline value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Headline {
    /// The dashboard-wide overall sentiment rate.
    OverallRate,
    /// A named sub-metric of the category's own block.
    SubMetric(&'static str),
}

/// How the detail view of a category is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKind {
    Generic,
    Predictive,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::CoreSentiment,
        Category::Positivity,
        Category::Negativity,
        Category::IntensityRisk,
        Category::TopicsAspects,
        Category::VolumeCoverage,
        Category::PredictiveAnalysis,
    ];

    /// Name used as the key in `dashboard.masters`.
    pub fn name(self) -> &'static str {
        match self {
            Category::CoreSentiment => "Core Sentiment",
            Category::Positivity => "Positivity",
            Category::Negativity => "Negativity",
            Category::IntensityRisk => "Intensity & Risk",
            Category::TopicsAspects => "Topics & Aspects",
            Category::VolumeCoverage => "Volume & Coverage",
            Category::PredictiveAnalysis => "Predictive Analysis",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(name))
    }

    pub fn headline(self) -> Headline {
        match self {
            Category::CoreSentiment => Headline::OverallRate,
            Category::Positivity => Headline::SubMetric("positivity_ratio"),
            Category::Negativity => Headline::SubMetric("negativity_rate"),
            Category::IntensityRisk => Headline::SubMetric("intensity_index"),
            Category::TopicsAspects => Headline::SubMetric("top_topics"),
            Category::VolumeCoverage => Headline::SubMetric("sources_count"),
            Category::PredictiveAnalysis => Headline::SubMetric("status"),
        }
    }

    pub fn detail_kind(self) -> DetailKind {
        match self {
            Category::PredictiveAnalysis => DetailKind::Predictive,
            _ => DetailKind::Generic,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
