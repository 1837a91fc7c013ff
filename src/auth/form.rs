//! Form state with touched tracking. Values are re-validated on every change,
//! but an error only becomes visible once its field has been edited or left,
//! or after a submit attempt.

use crate::auth::validation::{Field, FieldErrors, FormValues};
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
pub struct Form<V> {
    values: V,
    touched: BTreeSet<Field>,
    errors: FieldErrors,
}

impl<V: FormValues + Default> Default for Form<V> {
    fn default() -> Self {
        Self::from_values(V::default())
    }
}

impl<V: FormValues + Default> Form<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<V: FormValues> Form<V> {
    #[must_use]
    pub fn from_values(values: V) -> Self {
        let errors = values.validate();
        Self {
            values,
            touched: BTreeSet::new(),
            errors,
        }
    }

    #[must_use]
    pub const fn values(&self) -> &V {
        &self.values
    }

    /// Updates a field, marks it touched and re-runs validation.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.set(field, value.into());
        self.touched.insert(field);
        self.errors = self.values.validate();
    }

    pub fn blur(&mut self, field: Field) {
        self.touched.insert(field);
    }

    /// Clears a field back to empty and untouched.
    pub fn reset(&mut self, field: Field) {
        self.values.set(field, String::new());
        self.touched.remove(&field);
        self.errors = self.values.validate();
    }

    #[must_use]
    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    /// Every current error, touched or not.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub fn visible_errors(&self) -> FieldErrors {
        self.errors.filtered(|field| self.touched.contains(&field))
    }

    /// Visible error for one field.
    #[must_use]
    pub fn error(&self, field: Field) -> Option<&str> {
        if self.is_touched(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.errors.is_empty()
    }

    /// Marks all fields touched and validates.
    ///
    /// # Errors
    /// Returns the full error mapping when submission is blocked.
    pub fn submit(&mut self) -> Result<V::Valid, FieldErrors> {
        self.touched.extend(V::FIELDS.iter().copied());
        self.errors = self.values.validate();
        self.values.validated()
    }
}
