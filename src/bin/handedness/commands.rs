//! Command handlers.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use handedness_models::{
    DistributionSet, RenderOptions, SummaryOptions, compute_with_options, layout,
    parse_hex_color, render_parameter_table, render_summary_table, render_svg, summarize,
    validate,
};

use crate::error::CliError;
use crate::interactive::Session;
use crate::{ParameterArgs, RenderArgs, SummaryArgs};

fn compute_set(params: &ParameterArgs) -> Result<DistributionSet, CliError> {
    let validated = validate(&params.request())?;
    Ok(compute_with_options(&validated, params.engine_options())?)
}

pub fn render_options(args: &RenderArgs) -> Result<RenderOptions, CliError> {
    let options = RenderOptions {
        width: args.width,
        height: args.height,
        color: parse_hex_color(&args.color)?,
        ..RenderOptions::default()
    };
    options.validate()?;
    Ok(options)
}

pub const fn summary_options(args: &SummaryArgs) -> SummaryOptions {
    SummaryOptions {
        credible_mass: args.credible_mass,
        precision: args.precision,
    }
}

/// Parameter table followed by the distribution summary table.
pub fn summary_text(set: &DistributionSet, options: SummaryOptions) -> Result<String, CliError> {
    let summaries = summarize(set, options)?;
    Ok(format!(
        "{}\n{}",
        render_parameter_table(set, options.precision),
        render_summary_table(&summaries, options.precision)
    ))
}

pub fn plot(params: &ParameterArgs, render: &RenderArgs, output: &Path) -> Result<(), CliError> {
    let options = render_options(render)?;
    let set = compute_set(params)?;
    render_svg(&layout(&set), output, &options)?;
    println!("wrote {}", output.display());
    Ok(())
}

pub fn summary(params: &ParameterArgs, summary: &SummaryArgs) -> Result<(), CliError> {
    let set = compute_set(params)?;
    println!("{}", summary_text(&set, summary_options(summary))?);
    Ok(())
}

pub fn export(params: &ParameterArgs, output: Option<&Path>, pretty: bool) -> Result<(), CliError> {
    let set = compute_set(params)?;
    let grid = layout(&set);
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    if pretty {
        serde_json::to_writer_pretty(&mut writer, &grid)?;
    } else {
        serde_json::to_writer(&mut writer, &grid)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    if let Some(path) = output {
        tracing::info!(path = %path.display(), "exported chart grid");
    }
    Ok(())
}

pub fn interactive(
    params: &ParameterArgs,
    render: &RenderArgs,
    summary: &SummaryArgs,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let render_options = render_options(render)?;
    let mut session = Session::new(params.request(), params.engine_options());
    let stdin = io::stdin();
    let stdout = io::stdout();
    session.run(
        stdin.lock(),
        stdout.lock(),
        summary_options(summary),
        output.map(|path| (path, &render_options)),
    )
}
