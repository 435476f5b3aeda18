#![forbid(unsafe_code)]

//! # `handedness_models`
//!
//! Prior, likelihood, posterior and predictive distributions for a binary
//! trait (left- versus right-handedness) in a finite population.
//!
//! A Beta prior on the population-wide left-handed rate is updated with
//! observed counts; predictions for the whole population come from the
//! Beta-Binomial (prior and posterior predictive) and from a Binomial at the
//! observed rate (plug-in prediction). The results are laid out as a 2×3 grid
//! of charts and can be rendered to SVG or summarized as tables.
//!
//! # Examples
//!
//! ```
//! use handedness_models::{ParameterRequest, compute, layout, validate};
//!
//! let request = ParameterRequest {
//!     alpha: 2.0,
//!     beta: 2.0,
//!     left_count: 4,
//!     right_count: 1,
//!     requested_population: 20,
//! };
//! let params = validate(&request).expect("valid request");
//! let set = compute(&params).expect("proper prior");
//!
//! let plug_in = set.plug_in.as_ref().expect("observations present");
//! assert_eq!(plug_in.counts().next(), Some(4));
//! assert_eq!(plug_in.last_count(), 19);
//!
//! let grid = layout(&set);
//! assert_eq!(grid.panels.len(), 6);
//! ```

pub mod distributions;
pub mod input;
pub mod layout;
pub mod render;
pub mod utils;

pub use input::{
    DEFAULT_POPULATION, InputError, MAX_POPULATION, ModelParameters, Observation, ParameterRequest,
    PriorSpec, ratchet_population, validate,
};

pub use distributions::density::{
    beta_binomial_mass, beta_cdf, beta_density, beta_quantile, binomial_mass, ln_beta,
};
pub use distributions::engine::{
    DEFAULT_RESOLUTION, DistributionError, DistributionSet, EngineOptions, compute,
    compute_with_options,
};
pub use distributions::series::{DensityCurve, DiscreteFamily, DistributionKind, MassFunction};
pub use distributions::summary::{
    DistributionSummaries, DistributionSummary, SummaryOptions, render_parameter_table,
    render_summary_table, summarize,
};

pub use layout::{COUNT_AXIS_LABEL, ChartGrid, Panel, RATE_AXIS_LABEL, Series, layout};
pub use render::{
    DEFAULT_COLOR, RenderError, RenderOptions, parse_hex_color, render_svg, render_svg_string,
};
