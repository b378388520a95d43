//! Tristate flag registry.
//!
//! Each flag derives a boolean from a record. A filter setting of `Some(b)` requires
//! the derived value to equal `b`; `None` leaves the flag unconstrained.

use crate::model::Prescription;

/// A named derived boolean.
#[derive(Debug, Clone, Copy)]
pub struct FlagSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub derive: fn(&Prescription) -> bool,
}

fn has_medications(rx: &Prescription) -> bool {
    rx.medications.iter().any(|m| !m.name.trim().is_empty())
}

fn has_vision(rx: &Prescription) -> bool {
    rx.vision.as_ref().is_some_and(|v| v.is_populated())
}

pub const FLAGS: &[FlagSpec] = &[
    FlagSpec {
        name: "has_medications",
        label: "Has medications",
        derive: has_medications,
    },
    FlagSpec {
        name: "has_vision",
        label: "Has vision prescription",
        derive: has_vision,
    },
];

pub fn get_flag(name: &str) -> Option<&'static FlagSpec> {
    FLAGS.iter().find(|flag| flag.name == name)
}

/// Derived value of flag `name` for `rx`, or `None` for an unknown flag.
pub fn derive_flag(rx: &Prescription, name: &str) -> Option<bool> {
    get_flag(name).map(|flag| (flag.derive)(rx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EyeMeasurement, Medication, VisionPrescription};

    #[test]
    fn has_medications_ignores_blank_names() {
        let mut rx = Prescription::new("1");
        assert_eq!(derive_flag(&rx, "has_medications"), Some(false));

        rx.medications = vec![Medication::new("  ")];
        assert_eq!(derive_flag(&rx, "has_medications"), Some(false));

        rx.medications.push(Medication::new("Timolol"));
        assert_eq!(derive_flag(&rx, "has_medications"), Some(true));
    }

    #[test]
    fn has_vision_requires_a_measurement() {
        let mut rx = Prescription::new("1");
        assert_eq!(derive_flag(&rx, "has_vision"), Some(false));

        rx.vision = Some(VisionPrescription::default());
        assert_eq!(derive_flag(&rx, "has_vision"), Some(false));

        rx.vision = Some(VisionPrescription {
            right_eye: Some(EyeMeasurement {
                axis: Some(180),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert_eq!(derive_flag(&rx, "has_vision"), Some(true));
    }

    #[test]
    fn unknown_flag_is_none() {
        assert_eq!(derive_flag(&Prescription::new("1"), "has_allergies"), None);
    }
}
