use camino::Utf8PathBuf;
use clap::Parser;
use miette::{Context, IntoDiagnostic};

use draw2svg::measure::{parse_factors, parse_fit, parse_measure, parse_measure_pair, parse_unit};
use draw2svg::render::{Align, AspectFit, AspectRatio, Sizing};
use draw2svg::{RenderOptions, ScaleMode, convert};

#[derive(Parser, Debug)]
#[command(name = "draw2svg")]
#[command(about = "Convert a drawfile to SVG")]
#[command(version)]
struct Cli {
    /// Drawfile to read
    input: Utf8PathBuf,

    /// SVG file to write
    output: Utf8PathBuf,

    /// Width of thin lines, as number[unit]
    #[arg(long, value_name = "MEASURE")]
    thin: Option<String>,

    /// Unit for the declared size: in, mm, cm, pt or native
    #[arg(long, short = 'u', value_name = "UNIT")]
    units: Option<String>,

    /// Set x and y on the root element
    #[arg(long)]
    xy: bool,

    /// Write group contents without <g> wrappers
    #[arg(long)]
    flatten_groups: bool,

    /// Convert input without the drawfile signature
    #[arg(long)]
    no_type_check: bool,

    /// How the image size is declared
    #[arg(long, value_enum, default_value_t = Sizing::Percent)]
    size: Sizing,

    /// Background paint, e.g. "#fff"
    #[arg(long, value_name = "PAINT")]
    bg: Option<String>,

    /// Convert text to outlines (needs an outline font service)
    #[arg(long)]
    text_to_path: bool,

    /// Scale factors x[,y]
    #[arg(long, value_name = "X[,Y]", overrides_with = "fit")]
    scale: Option<String>,

    /// Scale to fit a box; "*" leaves an axis free
    #[arg(long, value_name = "W,H", overrides_with = "scale")]
    fit: Option<String>,

    /// Margin width[,height], unscaled
    #[arg(long, value_name = "W[,H]")]
    margin: Option<String>,

    /// Aspect-ratio policy
    #[arg(long, value_enum, default_value_t = AspectFit::Meet)]
    aspect: AspectFit,

    /// Horizontal alignment within the viewport
    #[arg(long, value_enum, default_value_t = Align::Mid)]
    xalign: Align,

    /// Vertical alignment within the viewport
    #[arg(long, value_enum, default_value_t = Align::Mid)]
    yalign: Align,

    /// Write absolute path commands only
    #[arg(long)]
    absolute_coords: bool,
}

impl Cli {
    fn options(&self) -> miette::Result<RenderOptions> {
        let mut options = RenderOptions {
            sizing: self.size,
            aspect: AspectRatio {
                fit: self.aspect,
                x: self.xalign,
                y: self.yalign,
            },
            groups: !self.flatten_groups,
            top_xy: self.xy,
            background: self.bg.clone(),
            text_to_path: self.text_to_path,
            relative_coords: !self.absolute_coords,
            check_signature: !self.no_type_check,
            ..Default::default()
        };
        if let Some(thin) = &self.thin {
            options.thin = parse_measure("thin", thin)?;
        }
        if let Some(units) = &self.units {
            options.unit = parse_unit(units)?;
        }
        if let Some(scale) = &self.scale {
            options.scale = ScaleMode::Factor(parse_factors(scale)?);
        }
        if let Some(fit) = &self.fit {
            options.scale = parse_fit(fit)?;
        }
        if let Some(margin) = &self.margin {
            options.margin = parse_measure_pair("margin", margin)?;
        }
        Ok(options)
    }
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = cli.options()?;

    let data = std::fs::read(&cli.input)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot read {}", cli.input))?;
    let conversion = convert(&data, &options)?;

    for warning in conversion.warnings {
        eprintln!("{:?}", miette::Report::new(warning));
    }

    std::fs::write(&cli.output, conversion.svg)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot write {}", cli.output))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn options(args: &[&str]) -> RenderOptions {
        let mut argv = vec!["draw2svg", "in", "out"];
        argv.extend(args);
        Cli::try_parse_from(argv).unwrap().options().unwrap()
    }

    #[test]
    fn last_sizing_option_wins() {
        assert_eq!(
            options(&["--fit", "100,*", "--scale", "2"]).scale,
            ScaleMode::Factor(DVec2::splat(2.0))
        );
        assert_eq!(
            options(&["--scale", "2", "--fit", "100,*"]).scale,
            ScaleMode::FitWidth(100.0)
        );
    }

    #[test]
    fn bad_values_are_reported() {
        let cli = Cli::try_parse_from(["draw2svg", "in", "out", "--thin", "2furlongs"]).unwrap();
        assert!(cli.options().is_err());
    }
}
