//! Field rules for the sign-up and sign-in forms. Every check is synchronous
//! and side-effect free so it can run on each keystroke as well as on submit.

use crate::auth::types::{Credentials, ProfileFields, Registration};
use regex::Regex;
use secrecy::SecretString;
use std::{collections::BTreeMap, fmt};

pub const FULL_NAME_MIN: usize = 3;
pub const FULL_NAME_MAX: usize = 40;
pub const USER_NAME_MIN: usize = 3;
pub const USER_NAME_MAX: usize = 20;
pub const PASSWORD_MIN: usize = 6;

/// HTML address grammar: domain labels are alphanumeric with inner hyphens,
/// separated by single dots. At least two labels are required.
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$";
const PHONE_PATTERN: &str = r"^[0-9]{10}$";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    UserName,
    Email,
    Phone,
    Password,
    ConfirmPassword,
}

impl Field {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::UserName => "userName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
        }
    }

    /// Prompt text shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullName => "Full name",
            Self::UserName => "User name (optional)",
            Self::Email => "Email",
            Self::Phone => "Phone number",
            Self::Password => "Password",
            Self::ConfirmPassword => "Confirm password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failing fields mapped to their messages. Empty means the form may be submitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn check(&mut self, field: Field, message: Option<String>) {
        if let Some(message) = message {
            self.0.insert(field, message);
        }
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Keeps only the fields accepted by `keep`.
    #[must_use]
    pub fn filtered(&self, mut keep: impl FnMut(Field) -> bool) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(field, _)| keep(**field))
                .map(|(field, message)| (*field, message.clone()))
                .collect(),
        )
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(|field| field.name()).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(EMAIL_PATTERN).is_ok_and(|re| re.is_match(email))
}

#[must_use]
pub fn valid_phone(phone: &str) -> bool {
    Regex::new(PHONE_PATTERN).is_ok_and(|re| re.is_match(phone))
}

fn length(value: &str) -> usize {
    value.chars().count()
}

#[must_use]
pub fn check_full_name(value: &str) -> Option<String> {
    let len = length(value);
    if value.is_empty() {
        Some("Full name is required".to_string())
    } else if len < FULL_NAME_MIN {
        Some(format!("Name can not be less than {FULL_NAME_MIN} characters"))
    } else if len > FULL_NAME_MAX {
        Some(format!("Name can not exceed {FULL_NAME_MAX} characters"))
    } else {
        None
    }
}

/// User name is optional; only a non-empty value is length checked.
#[must_use]
pub fn check_user_name(value: &str) -> Option<String> {
    let len = length(value);
    if value.is_empty() {
        None
    } else if len < USER_NAME_MIN {
        Some(format!(
            "User name can not be less than {USER_NAME_MIN} characters"
        ))
    } else if len > USER_NAME_MAX {
        Some(format!("User name can not exceed {USER_NAME_MAX} characters"))
    } else {
        None
    }
}

#[must_use]
pub fn check_email(value: &str) -> Option<String> {
    if value.is_empty() {
        Some("Email is required".to_string())
    } else if valid_email(value) {
        None
    } else {
        Some("Invalid email".to_string())
    }
}

#[must_use]
pub fn check_phone(value: &str) -> Option<String> {
    if value.is_empty() {
        Some("Phone number is required".to_string())
    } else if valid_phone(value) {
        None
    } else {
        Some("Phone must be exactly 10 digits".to_string())
    }
}

#[must_use]
pub fn check_password(value: &str) -> Option<String> {
    if value.is_empty() {
        Some("Password is required".to_string())
    } else if length(value) < PASSWORD_MIN {
        Some(format!(
            "Password must be at least {PASSWORD_MIN} characters"
        ))
    } else {
        None
    }
}

/// Errors only when the confirmation differs from the password. Two empty
/// values are left to the password rule.
#[must_use]
pub fn check_confirm_password(password: &str, confirm: &str) -> Option<String> {
    if confirm == password {
        None
    } else if confirm.is_empty() {
        Some("Confirm password is required".to_string())
    } else {
        Some("Passwords must match".to_string())
    }
}

/// Raw values of a form, independent of how they are rendered.
pub trait FormValues: Clone {
    /// Value produced by a clean submission.
    type Valid;

    /// Fields in display order.
    const FIELDS: &'static [Field];

    fn get(&self, field: Field) -> &str;

    /// Fields that do not belong to the form are ignored.
    fn set(&mut self, field: Field, value: String);

    fn validate(&self) -> FieldErrors;

    /// Builds the submission, or returns every failing field.
    ///
    /// # Errors
    /// Returns the error mapping when any rule fails.
    fn validated(&self) -> Result<Self::Valid, FieldErrors>;
}

/// Values of the sign-up form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignUpValues {
    pub full_name: String,
    pub user_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl FormValues for SignUpValues {
    type Valid = Registration;

    const FIELDS: &'static [Field] = &[
        Field::FullName,
        Field::UserName,
        Field::Email,
        Field::Phone,
        Field::Password,
        Field::ConfirmPassword,
    ];

    fn get(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::UserName => &self.user_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
        }
    }

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::FullName => self.full_name = value,
            Field::UserName => self.user_name = value,
            Field::Email => self.email = value,
            Field::Phone => self.phone = value,
            Field::Password => self.password = value,
            Field::ConfirmPassword => self.confirm_password = value,
        }
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check(Field::FullName, check_full_name(&self.full_name));
        errors.check(Field::UserName, check_user_name(&self.user_name));
        errors.check(Field::Email, check_email(&self.email));
        errors.check(Field::Phone, check_phone(&self.phone));
        errors.check(Field::Password, check_password(&self.password));
        errors.check(
            Field::ConfirmPassword,
            check_confirm_password(&self.password, &self.confirm_password),
        );
        errors
    }

    fn validated(&self) -> Result<Registration, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Registration {
            credentials: Credentials {
                email: self.email.clone(),
                password: SecretString::from(self.password.clone()),
            },
            profile: ProfileFields {
                full_name: self.full_name.clone(),
                user_name: (!self.user_name.is_empty()).then(|| self.user_name.clone()),
                phone: self.phone.clone(),
            },
        })
    }
}

/// Values of the sign-in form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignInValues {
    pub email: String,
    pub password: String,
}

impl FormValues for SignInValues {
    type Valid = Credentials;

    const FIELDS: &'static [Field] = &[Field::Email, Field::Password];

    fn get(&self, field: Field) -> &str {
        match field {
            Field::Email => &self.email,
            Field::Password => &self.password,
            _ => "",
        }
    }

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Email => self.email = value,
            Field::Password => self.password = value,
            _ => {}
        }
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check(Field::Email, check_email(&self.email));
        errors.check(Field::Password, check_password(&self.password));
        errors
    }

    fn validated(&self) -> Result<Credentials, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Credentials {
            email: self.email.clone(),
            password: SecretString::from(self.password.clone()),
        })
    }
}

/// Checks only the credential triple (email, password, confirmation).
#[must_use]
pub fn validate_credentials(email: &str, password: &str, confirm_password: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check(Field::Email, check_email(email));
    errors.check(Field::Password, check_password(password));
    errors.check(
        Field::ConfirmPassword,
        check_confirm_password(password, confirm_password),
    );
    errors
}
