//! Discrete adjustments to the band tracker, independent of any input device.

use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

impl Step {
    pub fn sign(self) -> f32 {
        match self {
            Step::Up => 1.0,
            Step::Down => -1.0,
        }
    }
}

/// Which end of a band's bin range to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandEdge {
    Bottom,
    Top,
}

/// Which endpoint of a band's linear mapping to nudge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEndpoint {
    InputMin,
    InputMax,
    OutputMin,
    OutputMax,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandCommand {
    /// Move a band edge by one bin
    MoveEdge {
        band: usize,
        edge: BandEdge,
        step: Step,
    },
    /// Nudge a mapping endpoint by the tracker's step size
    NudgeRange {
        band: usize,
        endpoint: RangeEndpoint,
        step: Step,
    },
    ToggleSmoothing,
    /// Nudge the smoothing coefficient; ignored while smoothing is off
    NudgeSmoothRate(Step),
    ToggleAutoMax,
    /// Forget every band's running maximum
    ResetPeaks,
}

/// Parses `band<N>.<target><+|->`, `smooth`, `smooth-rate<+|->`, `auto-max`
/// and `reset-peaks`, where target is one of `bottom`, `top`, `in-min`,
/// `in-max`, `out-min` or `out-max`.
impl FromStr for BandCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || Error::UnknownCommand(s.to_string());
        let text = s.trim();

        match text {
            "smooth" => return Ok(BandCommand::ToggleSmoothing),
            "auto-max" => return Ok(BandCommand::ToggleAutoMax),
            "reset-peaks" => return Ok(BandCommand::ResetPeaks),
            _ => {}
        }

        let (body, step) = split_step(text).ok_or_else(unknown)?;
        if body == "smooth-rate" {
            return Ok(BandCommand::NudgeSmoothRate(step));
        }

        let (band, target) = body
            .strip_prefix("band")
            .and_then(|rest| rest.split_once('.'))
            .ok_or_else(unknown)?;
        let band: usize = band.parse().map_err(|_| unknown())?;

        let edge = match target {
            "bottom" => Some(BandEdge::Bottom),
            "top" => Some(BandEdge::Top),
            _ => None,
        };
        if let Some(edge) = edge {
            return Ok(BandCommand::MoveEdge { band, edge, step });
        }

        let endpoint = match target {
            "in-min" => RangeEndpoint::InputMin,
            "in-max" => RangeEndpoint::InputMax,
            "out-min" => RangeEndpoint::OutputMin,
            "out-max" => RangeEndpoint::OutputMax,
            _ => return Err(unknown()),
        };
        Ok(BandCommand::NudgeRange {
            band,
            endpoint,
            step,
        })
    }
}

fn split_step(text: &str) -> Option<(&str, Step)> {
    if let Some(body) = text.strip_suffix('+') {
        Some((body, Step::Up))
    } else {
        text.strip_suffix('-').map(|body| (body, Step::Down))
    }
}
