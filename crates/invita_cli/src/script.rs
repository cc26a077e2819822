//! Gesture scripts for `invita simulate`
//!
//! A script is a list of steps, one per command-line argument:
//!
//! ```text
//! intro wait:800 advance wait:3000 scroll:0.5 offset:600 advance wait:2000
//! ```

use anyhow::{Context, Result};
use std::fmt;
use std::str::FromStr;

/// One step of a gesture script
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Click/tap the envelope
    Advance,
    /// Play the entrance animation
    Intro,
    /// Let frames run for this many milliseconds
    Wait(f32),
    /// Normalized scroll progress
    Scroll(f32),
    /// Raw scroll offset in pixels
    Offset(f32),
}

impl FromStr for Gesture {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };

        let number = |what: &str| -> Result<f32> {
            let arg =
                arg.with_context(|| format!("'{}' needs a value, e.g. {}:{}", name, name, what))?;
            let value: f32 = arg
                .parse()
                .with_context(|| format!("Invalid number '{}' in step '{}'", arg, s))?;
            if !value.is_finite() {
                anyhow::bail!("Step '{}' must be finite", s);
            }
            Ok(value)
        };

        let gesture = match name {
            "advance" | "click" | "tap" => Gesture::Advance,
            "intro" => Gesture::Intro,
            "wait" => {
                let ms = number("500")?;
                if ms < 0.0 {
                    anyhow::bail!("Cannot wait a negative time: '{}'", s);
                }
                Gesture::Wait(ms)
            }
            "scroll" => Gesture::Scroll(number("0.5")?),
            "offset" => Gesture::Offset(number("300")?),
            _ => anyhow::bail!(
                "Unknown step '{}'. Valid steps: advance, intro, wait:MS, scroll:P, offset:PX",
                s
            ),
        };

        if arg.is_some() && matches!(gesture, Gesture::Advance | Gesture::Intro) {
            anyhow::bail!("Step '{}' takes no value", name);
        }
        Ok(gesture)
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gesture::Advance => write!(f, "advance"),
            Gesture::Intro => write!(f, "intro"),
            Gesture::Wait(ms) => write!(f, "wait:{}", ms),
            Gesture::Scroll(p) => write!(f, "scroll:{}", p),
            Gesture::Offset(px) => write!(f, "offset:{}", px),
        }
    }
}

/// Parse every step, failing on the first malformed one
pub fn parse_script<S: AsRef<str>>(steps: &[S]) -> Result<Vec<Gesture>> {
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            step.as_ref()
                .parse()
                .with_context(|| format!("Step {} of the script", i + 1))
        })
        .collect()
}

/// Steps used when `simulate` is given none
pub fn default_script() -> Vec<Gesture> {
    vec![
        Gesture::Intro,
        Gesture::Wait(1000.0),
        Gesture::Advance,
        Gesture::Wait(3000.0),
        Gesture::Scroll(0.5),
        Gesture::Scroll(1.0),
        Gesture::Scroll(0.0),
        Gesture::Advance,
        Gesture::Wait(2000.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let steps = ["advance", "wait:1500", "scroll:0.25", "offset:300", "intro", "tap"];
        let script = parse_script(&steps).unwrap();
        assert_eq!(
            script,
            vec![
                Gesture::Advance,
                Gesture::Wait(1500.0),
                Gesture::Scroll(0.25),
                Gesture::Offset(300.0),
                Gesture::Intro,
                Gesture::Advance,
            ]
        );
    }

    #[test]
    fn test_reject_malformed_steps() {
        assert!("jump".parse::<Gesture>().is_err());
        assert!("wait".parse::<Gesture>().is_err());
        assert!("wait:soon".parse::<Gesture>().is_err());
        assert!("wait:-5".parse::<Gesture>().is_err());
        assert!("scroll:NaN".parse::<Gesture>().is_err());
        assert!("advance:2".parse::<Gesture>().is_err());
    }

    #[test]
    fn test_error_names_the_step() {
        let err = parse_script(&["advance", "bogus"]).unwrap_err();
        assert!(format!("{:#}", err).contains("Step 2"));
    }

    #[test]
    fn test_display_parses_back() {
        for gesture in default_script() {
            assert_eq!(gesture.to_string().parse::<Gesture>().unwrap(), gesture);
        }
    }
}
