use approx::{assert_abs_diff_eq, assert_relative_eq};
use handedness_models::{
    DiscreteFamily, DistributionError, DistributionKind, ParameterRequest, RenderOptions, Series,
    SummaryOptions, binomial_mass, compute, layout, render_summary_table, render_svg_string,
    summarize, validate,
};

fn request(alpha: f64, beta: f64, left: u64, right: u64, population: u64) -> ParameterRequest {
    ParameterRequest {
        alpha,
        beta,
        left_count: left,
        right_count: right,
        requested_population: population,
    }
}

#[test]
fn empty_sample_with_flat_prior_gives_uniform_prior_predictive() {
    let params = validate(&request(1.0, 1.0, 0, 0, 10)).expect("valid request");
    let set = compute(&params).expect("compute");

    assert!(set.likelihood.is_none());
    assert!(set.posterior.is_none());
    assert!(set.plug_in.is_none());
    assert!(set.posterior_predictive.is_none());
    assert_eq!(set.prior_predictive.counts().collect::<Vec<_>>(), (0..=10).collect::<Vec<_>>());
    for mass in &set.prior_predictive.mass {
        assert_relative_eq!(*mass, 1.0 / 11.0, max_relative = 1e-10);
    }

    let grid = layout(&set);
    let filled: Vec<_> = grid
        .panels
        .iter()
        .filter(|panel| !panel.series.is_empty())
        .map(|panel| (panel.row, panel.col))
        .collect();
    assert_eq!(filled, vec![(0, 0), (1, 0)]);
}

#[test]
fn fully_observed_population_collapses_predictions() {
    let params = validate(&request(1.0, 1.0, 3, 2, 5)).expect("valid request");
    assert_eq!(params.remaining(), 0);
    let set = compute(&params).expect("compute");

    let posterior = set.posterior.as_ref().expect("posterior");
    assert_relative_eq!(posterior.alpha, 4.0);
    assert_relative_eq!(posterior.beta, 3.0);
    // Beta(4, 3) = 60 p^3 (1 - p)^2
    let mid = posterior.x.len() / 2;
    let p = posterior.x[mid];
    assert_relative_eq!(
        posterior.density[mid],
        60.0 * p.powi(3) * (1.0 - p).powi(2),
        max_relative = 1e-10
    );

    for kind in [DistributionKind::PlugIn, DistributionKind::PosteriorPredictive] {
        let pmf = set.mass_function(kind).expect("prediction");
        assert_eq!(pmf.len(), 1);
        assert_eq!(pmf.offset, 3);
        assert_abs_diff_eq!(pmf.mass_at(3), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn plug_in_prediction_is_shifted_binomial_at_observed_rate() {
    let params = validate(&request(2.0, 2.0, 4, 1, 20)).expect("valid request");
    let set = compute(&params).expect("compute");

    let plug_in = set.plug_in.as_ref().expect("plug-in");
    assert_eq!(plug_in.family, DiscreteFamily::Binomial { trials: 15, p: 0.8 });
    let counts: Vec<u64> = plug_in.counts().collect();
    assert_eq!(counts, (4..=19).collect::<Vec<_>>());
    for (j, count) in counts.iter().enumerate() {
        let k = u64::try_from(j).expect("small index");
        assert_relative_eq!(
            plug_in.mass_at(*count),
            binomial_mass(k, 15, 0.8),
            max_relative = 1e-12
        );
    }

    let posterior_predictive = set.posterior_predictive.as_ref().expect("posterior predictive");
    assert_eq!(
        posterior_predictive.family,
        DiscreteFamily::BetaBinomial {
            trials: 15,
            alpha: 6.0,
            beta: 3.0
        }
    );
    assert_eq!(posterior_predictive.offset, 4);
}

#[test]
fn requested_population_below_total_is_raised() {
    let params = validate(&request(1.0, 1.0, 7, 6, 4)).expect("valid request");
    assert_eq!(params.population_size, 13);
    let set = compute(&params).expect("compute");
    assert_eq!(set.prior_predictive.last_count(), 13);
}

#[test]
fn improper_prior_fails_without_nan() {
    let params = validate(&request(1.0, 0.0, 2, 3, 10)).expect("zero is accepted at intake");
    let err = compute(&params).expect_err("improper prior");
    assert!(matches!(
        err,
        DistributionError::DegenerateDistribution {
            distribution: DistributionKind::Prior,
            ..
        }
    ));
}

#[test]
fn public_workflow_renders_figure_and_tables() {
    let params = validate(&request(2.0, 8.0, 3, 27, 120)).expect("valid request");
    let set = compute(&params).expect("compute");
    let grid = layout(&set);

    match &grid.panel(0, 2).expect("posterior slot").series {
        Series::Curve { points } => assert_eq!(points.len(), 1_000),
        other => panic!("expected a curve, got {other:?}"),
    }

    let svg = render_svg_string(&grid, &RenderOptions::default()).expect("render");
    assert!(svg.contains("Predictions given MLE"));

    let summaries = summarize(&set, SummaryOptions::default()).expect("summaries");
    assert_eq!(summaries.rows.len(), 6);
    let table = render_summary_table(&summaries, 3);
    assert!(table.contains("Posterior"));

    let json = serde_json::to_string(&grid).expect("serialize");
    assert!(json.contains("\"title\":\"Prior Predictive Distribution\""));
    assert!(json.contains("\"x_label\":\"Number of left handed students\""));
}
