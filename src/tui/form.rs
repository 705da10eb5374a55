//! Editable form state for the TUI.
//!
//! Holds the raw `ApplicantForm` plus cursor/edit state. Nothing is validated
//! here beyond keeping stepped values inside their domains; validation
//! happens once, on submit.

use crate::domain::{
    AGE_MAX, AGE_MIN, ApplicantForm, BMI_MAX, BMI_MIN, CHILDREN_MAX, CHILDREN_MIN, Category,
    Region, Sex, Smoker,
};

/// Number of input fields (the submit button follows them).
pub const FIELD_COUNT: usize = 6;
pub const SUBMIT_INDEX: usize = FIELD_COUNT;

const AGE: usize = 0;
const SEX: usize = 1;
const BMI: usize = 2;
const CHILDREN: usize = 3;
const SMOKER: usize = 4;
const REGION: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: ApplicantForm,
    selected: usize,
    edit: Option<String>,
}

impl FormState {
    pub fn values(&self) -> &ApplicantForm {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut ApplicantForm {
        &mut self.values
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected < SUBMIT_INDEX {
            self.selected += 1;
        }
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Start typing into the selected field. Only numeric fields are typed.
    pub fn begin_edit(&mut self) -> bool {
        if !matches!(self.selected, AGE | BMI | CHILDREN) {
            return false;
        }
        self.edit = Some(String::new());
        true
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    pub fn commit_edit(&mut self) {
        let Some(buf) = self.edit.take() else {
            return;
        };
        if buf.trim().is_empty() {
            return;
        }
        if let Some(field) = self.field_mut(self.selected) {
            *field = buf.trim().to_string();
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(buf) = &mut self.edit {
            if c.is_ascii_digit() || c == '.' || c == '-' {
                buf.push(c);
            }
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(buf) = &mut self.edit {
            buf.pop();
        }
    }

    /// Step the selected field: numbers by one unit (BMI by 0.1), enums cycle.
    ///
    /// Unparseable text resets to the form default before stepping.
    pub fn adjust(&mut self, delta: i64) {
        let v = &mut self.values;
        match self.selected {
            AGE => {
                let cur = v.age.trim().parse::<i64>().unwrap_or(30);
                v.age = (cur + delta).clamp(AGE_MIN, AGE_MAX).to_string();
            }
            SEX => v.sex = step(&v.sex, Sex::Male, delta).as_str().to_string(),
            BMI => {
                let cur = v.bmi.trim().parse::<f64>().unwrap_or(25.0);
                let tenths = (cur * 10.0).round() + delta as f64;
                v.bmi = format!("{:.1}", (tenths / 10.0).clamp(BMI_MIN, BMI_MAX));
            }
            CHILDREN => {
                let cur = v.children.trim().parse::<i64>().unwrap_or(0);
                v.children = (cur + delta).clamp(CHILDREN_MIN, CHILDREN_MAX).to_string();
            }
            SMOKER => v.smoker = step(&v.smoker, Smoker::Yes, delta).as_str().to_string(),
            REGION => v.region = step(&v.region, Region::Southeast, delta).as_str().to_string(),
            _ => {}
        }
    }

    /// `(label, shown value)` for each input field.
    pub fn rows(&self) -> Vec<(String, String)> {
        let v = &self.values;
        let values = [&v.age, &v.sex, &v.bmi, &v.children, &v.smoker, &v.region];
        values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let shown = match &self.edit {
                    Some(buf) if i == self.selected => format!("{buf}_"),
                    _ => value.to_string(),
                };
                (label(i), shown)
            })
            .collect()
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        let v = &mut self.values;
        match index {
            AGE => Some(&mut v.age),
            SEX => Some(&mut v.sex),
            BMI => Some(&mut v.bmi),
            CHILDREN => Some(&mut v.children),
            SMOKER => Some(&mut v.smoker),
            REGION => Some(&mut v.region),
            _ => None,
        }
    }
}

fn step<C: Category>(raw: &str, fallback: C, delta: i64) -> C {
    let cur = C::parse(raw).unwrap_or(fallback);
    if delta >= 0 { cur.next() } else { cur.prev() }
}

fn label(index: usize) -> String {
    match index {
        AGE => format!("Age ({AGE_MIN}-{AGE_MAX})"),
        SEX => "Sex".to_string(),
        BMI => format!("BMI ({BMI_MIN:.1}-{BMI_MAX:.1})"),
        CHILDREN => format!("Children ({CHILDREN_MIN}-{CHILDREN_MAX})"),
        SMOKER => "Does user smoke?".to_string(),
        REGION => "Region".to_string(),
        _ => String::new(),
    }
}
