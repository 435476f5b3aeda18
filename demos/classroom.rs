use handedness_models::{
    ParameterRequest, RenderOptions, SummaryOptions, compute, layout, render_summary_table,
    render_svg, summarize, validate,
};

fn main() {
    // A class of 30 students, 8 already surveyed.
    let request = ParameterRequest {
        alpha: 2.0,
        beta: 8.0,
        left_count: 2,
        right_count: 6,
        requested_population: 30,
    };
    let params = validate(&request).expect("valid request");
    let set = compute(&params).expect("compute");

    let summaries = summarize(&set, SummaryOptions::default()).expect("summaries");
    println!("{}", render_summary_table(&summaries, 3));

    let posterior_predictive = set
        .posterior_predictive
        .as_ref()
        .expect("observations present");
    let at_least_five: f64 = posterior_predictive
        .points()
        .filter(|(count, _)| *count >= 5)
        .map(|(_, mass)| mass)
        .sum();
    println!("P(at least 5 left-handed students) = {at_least_five:.3}");

    let path = std::env::temp_dir().join("classroom.svg");
    render_svg(&layout(&set), &path, &RenderOptions::default()).expect("render");
    println!("figure: {}", path.display());
}
