use crate::model::{
    EyeMeasurement, Medication, Prescription, PrescriptionStatus, Priority, VisionPrescription,
};

/// Fluent fixture builder for prescriptions.
pub struct RxBuilder {
    rx: Prescription,
}

impl RxBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            rx: Prescription::new(id),
        }
    }

    pub fn patient(mut self, name: &str) -> Self {
        self.rx.patient_name = Some(name.to_string());
        self
    }

    pub fn doctor(mut self, name: &str) -> Self {
        self.rx.doctor_name = Some(name.to_string());
        self
    }

    pub fn diagnosis(mut self, diagnosis: &str) -> Self {
        self.rx.diagnosis = Some(diagnosis.to_string());
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.rx.notes = Some(notes.to_string());
        self
    }

    pub fn status(mut self, status: PrescriptionStatus) -> Self {
        self.rx.status = Some(status);
        self
    }

    pub fn date(mut self, date: &str) -> Self {
        self.rx.date = Some(date.to_string());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.rx.priority = Some(priority);
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.rx.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn medication(mut self, name: &str, dosage: &str) -> Self {
        self.rx.medications.push(Medication::new(name).with_dosage(dosage));
        self
    }

    pub fn right_sphere(mut self, sphere: f32) -> Self {
        let vision = self.rx.vision.get_or_insert_with(VisionPrescription::default);
        vision.right_eye = Some(EyeMeasurement {
            sphere: Some(sphere),
            ..Default::default()
        });
        self
    }

    pub fn build(self) -> Prescription {
        self.rx
    }
}

/// Ids of a result sequence, in order.
pub fn ids(records: &[&Prescription]) -> Vec<String> {
    records.iter().map(|rx| rx.id.clone()).collect()
}
