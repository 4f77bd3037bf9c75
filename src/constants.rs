//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.
//!
//! The financial and priority values are carried over as-is from the
//! assessment model they describe. They have no cited source and are kept
//! as named values rather than "corrected".

/// Repository profiler thresholds and weights
pub mod profiler {
    /// API route matches needed before a repository counts as service-oriented
    pub const SERVICE_ORIENTED_ROUTE_MATCHES: usize = 20;

    /// File count above which a repository is considered modular
    pub const MODULAR_FILE_COUNT: usize = 500;

    /// File count above which complexity is high
    pub const HIGH_COMPLEXITY_FILE_COUNT: usize = 1000;

    /// File count above which complexity is medium
    pub const MEDIUM_COMPLEXITY_FILE_COUNT: usize = 200;

    /// Test-to-source ratio for a `high` test coverage level
    pub const TEST_RATIO_HIGH: f64 = 0.3;

    /// Test-to-source ratio for a `medium` test coverage level
    pub const TEST_RATIO_MEDIUM: f64 = 0.1;

    /// Quality score weights
    pub mod quality {
        pub const BASE: u32 = 50;
        pub const TESTS: u32 = 20;
        pub const DOCS: u32 = 10;
        pub const MONITORING: u32 = 10;
        pub const SECURITY: u32 = 10;

        /// Score at or above which quality is `high`
        pub const HIGH_THRESHOLD: u32 = 80;
        /// Score at or above which quality is `medium`
        pub const MEDIUM_THRESHOLD: u32 = 60;
    }
}

/// Impact analyzer buckets
pub mod impact {
    /// Matched files below this are effort S
    pub const EFFORT_S_BELOW: usize = 5;
    /// Matched files below this are effort M
    pub const EFFORT_M_BELOW: usize = 15;
    /// Matched files below this are effort L (otherwise XL)
    pub const EFFORT_L_BELOW: usize = 30;

    /// Path/name fragments marking production-critical components
    pub const PRODUCTION_MARKERS: &[&str] = &["prod", "production", "live"];

    /// Path hints at least this long may match as a token prefix
    pub const HINT_MIN_PREFIX_CHARS: usize = 4;
}

/// Recommendation priority model
pub mod priority {
    /// Effort penalty added to `impact * confidence`
    pub const PENALTY_S: i32 = 2;
    pub const PENALTY_M: i32 = 0;
    pub const PENALTY_L: i32 = -3;
    pub const PENALTY_XL: i32 = -6;

    /// Recommendations that receive steps, criteria and dependency links
    pub const DETAILED_TOP_N: usize = 5;

    /// Maximum evidence entries copied onto a recommendation
    pub const MAX_EVIDENCE: usize = 5;
}

/// Business metrics and cost model
pub mod financial {
    /// Fully loaded cost of one engineer for one week
    pub const WEEKLY_ENGINEERING_RATE: f64 = 10_000.0;

    /// Reporting currency
    pub const CURRENCY: &str = "USD";

    /// Base timeline weeks by scope
    pub mod base_weeks {
        pub const SMALL: f64 = 4.0;
        pub const MEDIUM: f64 = 8.0;
        pub const LARGE: f64 = 12.0;
    }

    /// Timeline multipliers by complexity level
    pub mod complexity_multiplier {
        pub const HIGH: f64 = 1.5;
        pub const MEDIUM: f64 = 1.2;
        pub const LOW: f64 = 1.0;
    }

    /// Complexity score above which the level is high
    pub const COMPLEXITY_HIGH_ABOVE: u32 = 7;
    /// Complexity score above which the level is medium
    pub const COMPLEXITY_MEDIUM_ABOVE: u32 = 4;

    /// File-count buckets feeding the complexity score
    pub const COMPLEXITY_FILES_HIGH: usize = 1000;
    pub const COMPLEXITY_FILES_MEDIUM: usize = 500;
    pub const COMPLEXITY_FILES_LOW: usize = 100;

    /// Impact-count buckets feeding the complexity score
    pub const COMPLEXITY_IMPACTS_HIGH: usize = 10;
    pub const COMPLEXITY_IMPACTS_LOW: usize = 5;

    /// Team size by complexity level
    pub mod team_size {
        pub const HIGH: u32 = 4;
        pub const MEDIUM: u32 = 3;
        pub const LOW: u32 = 2;
    }

    /// Benefit multipliers by change type
    pub mod benefit_multiplier {
        pub const OPTIMIZATION: f64 = 2.0;
        pub const MIGRATION: f64 = 1.5;
        pub const FEATURE: f64 = 1.8;
        pub const DEFAULT: f64 = 1.2;
    }

    /// Productivity gain percentage by change type
    pub mod productivity_gain {
        pub const OPTIMIZATION: f64 = 25.0;
        pub const REFACTORING: f64 = 20.0;
        pub const SCALING: f64 = 20.0;
        pub const MIGRATION: f64 = 15.0;
        pub const INTEGRATION: f64 = 15.0;
        pub const FEATURE: f64 = 10.0;
        pub const UPGRADE: f64 = 10.0;
        pub const ENHANCEMENT: f64 = 10.0;
        pub const BUGFIX: f64 = 5.0;
    }

    /// Engineering hours per effort bucket
    pub mod effort_hours {
        pub const S: f64 = 8.0;
        pub const M: f64 = 24.0;
        pub const L: f64 = 60.0;
        pub const XL: f64 = 120.0;
    }

    /// Share of direct-impact effort hours counted as tech debt reduction
    pub const TECH_DEBT_FACTOR: f64 = 0.5;

    /// Compliance points lost per compliance issue
    pub const COMPLIANCE_PENALTY_PER_ISSUE: f64 = 12.0;

    /// Compliance points lost when no security posture is detected
    pub const COMPLIANCE_PENALTY_NO_SECURITY: f64 = 10.0;

    /// Risk reduction model
    pub const RISK_REDUCTION_BASE_PCT: f64 = 10.0;
    pub const RISK_REDUCTION_PER_REC_PCT: f64 = 5.0;
    pub const RISK_REDUCTION_CAP_PCT: f64 = 60.0;

    /// Timeline phase shares (must sum to 1.0)
    pub mod phase_share {
        pub const DISCOVERY: f64 = 0.15;
        pub const BUILD: f64 = 0.55;
        pub const VALIDATION: f64 = 0.20;
        pub const ROLLOUT: f64 = 0.10;
    }
}

/// Repository snapshot limits
pub mod snapshot {
    /// Maximum file size to read or list (1MB)
    pub const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Route-like files whose contents are sampled
    pub const MAX_RAW_CONTENTS: usize = 20;

    /// Characters kept from each sampled file
    pub const MAX_CONTENT_CHARS: usize = 64 * 1024;

    /// Evidence entries kept per impact item
    pub const MAX_EVIDENCE_PER_ITEM: usize = 10;
}
