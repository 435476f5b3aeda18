//! Line-oriented input surface.
//!
//! Holds the five control values between interactions. Every accepted change
//! runs intake again with the population carried over from the previous
//! cycle, so a population raised to cover the observations stays raised.
//! A rejected change leaves the controls and the last output untouched.

use std::io::{BufRead, Write};
use std::path::Path;

use handedness_models::{
    DistributionSet, EngineOptions, ParameterRequest, RenderOptions, SummaryOptions,
    compute_with_options, layout, render_svg, validate,
};

use crate::commands::summary_text;
use crate::error::CliError;

const HELP: &str = "\
controls: alpha=<f64> beta=<f64> left=<u64> right=<u64> population=<u64>
commands: show, help, quit";

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Directive {
    Alpha(f64),
    Beta(f64),
    Left(u64),
    Right(u64),
    Population(u64),
    Show,
    Help,
    Quit,
}

impl Directive {
    /// Parse a line; blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CliError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        let parse_error = |reason: String| CliError::Parse {
            line: trimmed.to_string(),
            reason,
        };
        let Some((name, value)) = trimmed.split_once('=') else {
            return match trimmed {
                "show" => Ok(Some(Self::Show)),
                "help" | "?" => Ok(Some(Self::Help)),
                "quit" | "exit" => Ok(Some(Self::Quit)),
                _ => Err(parse_error("unknown command".to_string())),
            };
        };
        let value = value.trim();
        let real = || {
            value
                .parse::<f64>()
                .map_err(|e| parse_error(e.to_string()))
        };
        let count = || {
            value
                .parse::<u64>()
                .map_err(|e| parse_error(e.to_string()))
        };
        let directive = match name.trim() {
            "alpha" => Self::Alpha(real()?),
            "beta" => Self::Beta(real()?),
            "left" => Self::Left(count()?),
            "right" => Self::Right(count()?),
            "population" => Self::Population(count()?),
            other => return Err(parse_error(format!("unknown control `{other}`"))),
        };
        Ok(Some(directive))
    }

    const fn apply_to(self, request: &mut ParameterRequest) -> bool {
        match self {
            Self::Alpha(value) => request.alpha = value,
            Self::Beta(value) => request.beta = value,
            Self::Left(value) => request.left_count = value,
            Self::Right(value) => request.right_count = value,
            Self::Population(value) => request.requested_population = value,
            Self::Show | Self::Help | Self::Quit => return false,
        }
        true
    }
}

/// Control values and the latest successful output.
#[derive(Debug)]
pub struct Session {
    request: ParameterRequest,
    engine: EngineOptions,
    current: Option<DistributionSet>,
}

impl Session {
    pub const fn new(request: ParameterRequest, engine: EngineOptions) -> Self {
        Self {
            request,
            engine,
            current: None,
        }
    }

    pub const fn request(&self) -> &ParameterRequest {
        &self.request
    }

    pub const fn current(&self) -> Option<&DistributionSet> {
        self.current.as_ref()
    }

    /// Recompute from the current controls.
    pub fn refresh(&mut self) -> Result<&DistributionSet, CliError> {
        self.update(self.request)
    }

    /// Apply a control change and recompute.
    ///
    /// Returns `Ok(None)` for directives that do not change a control.
    pub fn apply(&mut self, directive: Directive) -> Result<Option<&DistributionSet>, CliError> {
        let mut candidate = self.request;
        if !directive.apply_to(&mut candidate) {
            return Ok(None);
        }
        self.update(candidate).map(Some)
    }

    fn update(&mut self, mut candidate: ParameterRequest) -> Result<&DistributionSet, CliError> {
        let params = validate(&candidate)?;
        candidate.adopt_population(&params);
        self.request = candidate;
        let set = compute_with_options(&params, self.engine)?;
        let set: &DistributionSet = self.current.insert(set);
        Ok(set)
    }

    /// Process `input` line by line until it ends or `quit` is read.
    ///
    /// Per-line failures are reported on `output` and do not stop the loop;
    /// only I/O errors on the streams themselves are returned.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        mut output: W,
        summary: SummaryOptions,
        figure: Option<(&Path, &RenderOptions)>,
    ) -> Result<(), CliError> {
        writeln!(output, "{HELP}")?;
        match self.refresh() {
            Ok(set) => report(&mut output, set, summary, figure)?,
            Err(err) => writeln!(output, "error: {err}")?,
        }
        for line in input.lines() {
            let line = line?;
            let directive = match Directive::parse(&line) {
                Ok(Some(directive)) => directive,
                Ok(None) => continue,
                Err(err) => {
                    writeln!(output, "error: {err}")?;
                    continue;
                }
            };
            match directive {
                Directive::Quit => break,
                Directive::Help => writeln!(output, "{HELP}")?,
                Directive::Show => {
                    let request = self.request();
                    writeln!(
                        output,
                        "alpha={} beta={} left={} right={} population={}",
                        request.alpha,
                        request.beta,
                        request.left_count,
                        request.right_count,
                        request.requested_population
                    )?;
                    match self.current() {
                        Some(set) => report(&mut output, set, summary, None)?,
                        None => writeln!(output, "nothing computed yet")?,
                    }
                }
                change => match self.apply(change) {
                    Ok(Some(set)) => report(&mut output, set, summary, figure)?,
                    Ok(None) => {}
                    Err(err) => {
                        tracing::warn!(error = %err, "update rejected");
                        writeln!(output, "error: {err}")?;
                    }
                },
            }
        }
        Ok(())
    }
}

fn report<W: Write>(
    output: &mut W,
    set: &DistributionSet,
    summary: SummaryOptions,
    figure: Option<(&Path, &RenderOptions)>,
) -> Result<(), CliError> {
    match summary_text(set, summary) {
        Ok(text) => writeln!(output, "{text}")?,
        Err(err) => writeln!(output, "error: {err}")?,
    }
    if let Some((path, options)) = figure
        && let Err(err) = render_svg(&layout(set), path, options)
    {
        writeln!(output, "error: {err}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn session() -> Session {
        Session::new(ParameterRequest::default(), EngineOptions { resolution: 101 })
    }

    #[test]
    fn directives_parse_controls_and_commands() {
        assert_eq!(
            Directive::parse("alpha = 1.5").expect("parse"),
            Some(Directive::Alpha(1.5))
        );
        assert_eq!(
            Directive::parse("left=4").expect("parse"),
            Some(Directive::Left(4))
        );
        assert_eq!(Directive::parse("quit").expect("parse"), Some(Directive::Quit));
        assert_eq!(Directive::parse("  ").expect("parse"), None);
        assert_eq!(Directive::parse("# note").expect("parse"), None);
        assert!(Directive::parse("left=-1").is_err());
        assert!(Directive::parse("gamma=2").is_err());
        assert!(Directive::parse("dance").is_err());
    }

    #[test]
    fn population_ratchet_persists_across_updates() {
        let mut session = session();
        session.apply(Directive::Left(8)).expect("update");
        session.apply(Directive::Right(7)).expect("update");
        assert_eq!(session.request().requested_population, 15);

        let set = session
            .apply(Directive::Right(0))
            .expect("update")
            .expect("changed");
        assert_eq!(set.parameters.population_size, 15);
        assert_eq!(session.request().requested_population, 15);
    }

    #[test]
    fn explicit_population_below_total_is_raised() {
        let mut session = session();
        session.apply(Directive::Left(3)).expect("update");
        session.apply(Directive::Right(2)).expect("update");
        let set = session
            .apply(Directive::Population(2))
            .expect("update")
            .expect("changed");
        assert_eq!(set.parameters.population_size, 5);
        assert_eq!(set.parameters.remaining(), 0);

        let set = session
            .apply(Directive::Population(30))
            .expect("update")
            .expect("changed");
        assert_eq!(set.parameters.population_size, 30);
    }

    #[test]
    fn rejected_change_keeps_previous_output() {
        let mut session = session();
        session.apply(Directive::Left(2)).expect("update");
        let before = session.current().cloned().expect("computed");

        assert!(session.apply(Directive::Alpha(-1.0)).is_err());
        assert_eq!(session.request().alpha, 1.0);
        assert_eq!(session.current(), Some(&before));

        assert!(session.apply(Directive::Alpha(0.0)).is_err());
        assert_eq!(session.current(), Some(&before));
    }

    #[test]
    fn run_reports_updates_and_errors() {
        let mut session = session();
        let input = Cursor::new("left=4\nright=1\nbogus\nalpha=0\nshow\nquit\nleft=9\n");
        let mut output = Vec::new();
        session
            .run(input, &mut output, SummaryOptions::default(), None)
            .expect("run");
        let text = String::from_utf8(output).expect("utf8");
        assert!(text.contains("Predictions given MLE"));
        assert!(text.contains("unknown command"));
        assert!(text.contains("degenerate"));
        assert!(text.contains("alpha=0 beta=1 left=4 right=1 population=10"));
        assert_eq!(session.request().left_count, 4);
    }
}
