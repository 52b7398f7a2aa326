//! Parsing of measure, scale and fit argument values
//!
//! Failures carry the argument text and a span so they can be shown as
//! labelled diagnostics.

use glam::{DVec2, dvec2};
use miette::{NamedSource, SourceSpan};
use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::errors::ArgError;
use crate::render::ScaleMode;
use crate::types::Unit;

#[derive(Parser)]
#[grammar = "measure.pest"]
struct MeasureParser;

/// One argument value being parsed
struct Arg<'a> {
    what: &'static str,
    expected: &'static str,
    text: &'a str,
}

impl<'a> Arg<'a> {
    fn source(&self) -> NamedSource<String> {
        NamedSource::new(self.what, self.text.to_string())
    }

    fn syntax(&self, span: SourceSpan, message: impl Into<String>) -> ArgError {
        ArgError::Syntax {
            what: self.what,
            expected: self.expected,
            src: self.source(),
            span,
            message: message.into(),
        }
    }

    /// The items of `rule`, without the end-of-input marker
    fn parse(&self, rule: Rule) -> Result<Vec<Pair<'a, Rule>>, ArgError> {
        let mut pairs = MeasureParser::parse(rule, self.text).map_err(|err| {
            let span: SourceSpan = match err.location {
                InputLocation::Pos(at) => (at, 0).into(),
                InputLocation::Span((start, end)) => (start, end - start).into(),
            };
            self.syntax(span, err.variant.message())
        })?;
        let top = pairs
            .next()
            .ok_or_else(|| self.syntax((0, self.text.len()).into(), "nothing parsed"))?;
        Ok(top.into_inner().filter(|p| p.as_rule() != Rule::EOI).collect())
    }

    fn number(&self, pair: &Pair<'_, Rule>) -> Result<f64, ArgError> {
        pair.as_str()
            .parse()
            .map_err(|_| self.syntax(span_of(pair), "not a number"))
    }

    /// A `measure` pair in draw-units
    fn measure(&self, pair: Pair<'_, Rule>) -> Result<f64, ArgError> {
        let mut inner = pair.into_inner();
        let Some(number) = inner.next() else {
            return Err(self.syntax((0, self.text.len()).into(), "missing number"));
        };
        let value = self.number(&number)?;
        match inner.next() {
            None => Ok(value),
            Some(unit) => Ok(self.unit(&unit)?.to_draw(value)),
        }
    }

    fn unit(&self, pair: &Pair<'_, Rule>) -> Result<Unit, ArgError> {
        Unit::from_suffix(pair.as_str()).ok_or_else(|| ArgError::UnknownUnit {
            unit: pair.as_str().to_string(),
            src: self.source(),
            span: span_of(pair),
        })
    }

    fn non_zero(&self, value: f64, pair: &Pair<'_, Rule>) -> Result<f64, ArgError> {
        if value == 0.0 || !value.is_finite() {
            return Err(ArgError::Zero {
                what: self.what,
                src: self.source(),
                span: span_of(pair),
            });
        }
        Ok(value)
    }
}

fn span_of(pair: &Pair<'_, Rule>) -> SourceSpan {
    let span = pair.as_span();
    (span.start(), span.end() - span.start()).into()
}

/// `number[unit]` in draw-units
pub fn parse_measure(what: &'static str, text: &str) -> Result<f64, ArgError> {
    let arg = Arg {
        what,
        expected: "number[unit]",
        text,
    };
    let mut items = arg.parse(Rule::measure_arg)?.into_iter();
    match items.next() {
        Some(pair) => arg.measure(pair),
        None => Err(arg.syntax((0, text.len()).into(), "missing measure")),
    }
}

/// `w[,h]` in draw-units; `h` defaults to `w`
pub fn parse_measure_pair(what: &'static str, text: &str) -> Result<DVec2, ArgError> {
    let arg = Arg {
        what,
        expected: "width[,height]",
        text,
    };
    let mut values = Vec::with_capacity(2);
    for pair in arg.parse(Rule::pair_arg)? {
        values.push(arg.measure(pair)?);
    }
    match values[..] {
        [w] => Ok(DVec2::splat(w)),
        [w, h] => Ok(dvec2(w, h)),
        _ => Err(arg.syntax((0, text.len()).into(), "expected one or two measures")),
    }
}

/// Scale factors `x[,y]`; `y` defaults to `x`
pub fn parse_factors(text: &str) -> Result<DVec2, ArgError> {
    let arg = Arg {
        what: "scale",
        expected: "x-scale[,y-scale]",
        text,
    };
    let mut values = Vec::with_capacity(2);
    for pair in arg.parse(Rule::factor_arg)? {
        let value = arg.number(&pair)?;
        values.push(arg.non_zero(value, &pair)?);
    }
    match values[..] {
        [x] => Ok(DVec2::splat(x)),
        [x, y] => Ok(dvec2(x, y)),
        _ => Err(arg.syntax((0, text.len()).into(), "expected one or two factors")),
    }
}

/// A fit box `(*|w),(*|h)`. `*,*` goes back to a unit scale.
pub fn parse_fit(text: &str) -> Result<ScaleMode, ArgError> {
    let arg = Arg {
        what: "fit",
        expected: "[*|width],[*|height]",
        text,
    };
    let mut axes = Vec::with_capacity(2);
    for pair in arg.parse(Rule::fit_arg)? {
        axes.push(match pair.as_rule() {
            Rule::free => None,
            _ => {
                let value = arg.measure(pair.clone())?;
                Some(arg.non_zero(value, &pair)?)
            }
        });
    }
    match axes[..] {
        [None, None] => Ok(ScaleMode::Factor(DVec2::ONE)),
        [Some(w), None] => Ok(ScaleMode::FitWidth(w)),
        [None, Some(h)] => Ok(ScaleMode::FitHeight(h)),
        [Some(w), Some(h)] => Ok(ScaleMode::FitBox(dvec2(w, h))),
        _ => Err(arg.syntax((0, text.len()).into(), "expected two axes")),
    }
}

/// An output unit name: `in`, `mm`, `cm`, `pt` or `native`
pub fn parse_unit(text: &str) -> Result<Unit, ArgError> {
    let arg = Arg {
        what: "units",
        expected: "in, mm, cm, pt or native",
        text,
    };
    let items = arg.parse(Rule::unit_arg)?;
    match items.first() {
        Some(pair) => arg.unit(pair),
        None => Err(arg.syntax((0, text.len()).into(), "missing unit")),
    }
}
