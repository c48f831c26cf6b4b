//! Variable classification: flux, state or discharge.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::PipelineError;

/// How a variable is aggregated over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VariableClass {
    /// Additive quantity, summed over time.
    Flux,
    /// Representative quantity, averaged over time.
    State,
    /// Rate converted to depth with the cell areas.
    Discharge,
}

impl VariableClass {
    /// Lowercase class name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Flux => "flux",
            Self::State => "state",
            Self::Discharge => "discharge",
        }
    }
}

impl fmt::Display for VariableClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The three disjoint variable lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    fluxes: BTreeSet<String>,
    states: BTreeSet<String>,
    discharge: BTreeSet<String>,
}

impl Classification {
    /// Builds a classification.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::OverlappingClasses`] if a name appears in two
    /// lists.
    pub fn new<I, S>(fluxes: I, states: I, discharge: I) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let c = Self {
            fluxes: fluxes.into_iter().map(Into::into).collect(),
            states: states.into_iter().map(Into::into).collect(),
            discharge: discharge.into_iter().map(Into::into).collect(),
        };
        let lists = [
            (VariableClass::Flux, &c.fluxes),
            (VariableClass::State, &c.states),
            (VariableClass::Discharge, &c.discharge),
        ];
        for (i, (first, a)) in lists.iter().enumerate() {
            for (second, b) in &lists[i + 1..] {
                if let Some(name) = a.intersection(b).next() {
                    return Err(PipelineError::OverlappingClasses {
                        variable: name.clone(),
                        first: first.name(),
                        second: second.name(),
                    });
                }
            }
        }
        Ok(c)
    }

    /// Class of `name`, or `None` if it is in no list.
    pub fn classify(&self, name: &str) -> Option<VariableClass> {
        if self.discharge.contains(name) {
            Some(VariableClass::Discharge)
        } else if self.fluxes.contains(name) {
            Some(VariableClass::Flux)
        } else if self.states.contains(name) {
            Some(VariableClass::State)
        } else {
            None
        }
    }

    /// Whether any discharge variable is configured among `names`.
    pub fn any_discharge<'a>(&self, mut names: impl Iterator<Item = &'a str>) -> bool {
        names.any(|n| self.discharge.contains(n))
    }
}
