//! Auth error types and their user-facing messages.

use henry_common::Locale;
use thiserror::Error;

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors from the directory, session, and profile operations.
///
/// Every variant is recoverable at the call site. `code()` gives a stable
/// identifier and `user_message()` the text to show the person at the keyboard.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No account matches the email or id.
    #[error("No account found for {0}")]
    NotFound(String),

    /// Secret did not match.
    #[error("Invalid credential")]
    InvalidCredential,

    /// Email (or id) is already registered.
    #[error("An account already exists for {0}")]
    AlreadyExists(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Secret must be at least {min_len} characters")]
    WeakSecret { min_len: usize },

    #[error("Unknown role: {0}")]
    InvalidRole(String),

    #[error("Account {0} is disabled")]
    AccountDisabled(String),

    #[error("No user is signed in")]
    NotSignedIn,

    /// Field cannot be changed through a profile merge.
    #[error("Field `{0}` cannot be changed")]
    ImmutableField(String),

    #[error("Invalid value for `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    /// Hashing or hash parsing failed.
    #[error("Credential error: {0}")]
    Credential(String),
}

impl AuthError {
    /// Stable error code, in the `auth/...` style the web client matches on.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "auth/user-not-found",
            Self::InvalidCredential => "auth/wrong-password",
            Self::AlreadyExists(_) => "auth/email-already-in-use",
            Self::InvalidEmail(_) => "auth/invalid-email",
            Self::WeakSecret { .. } => "auth/weak-password",
            Self::InvalidRole(_) => "auth/invalid-role",
            Self::AccountDisabled(_) => "auth/user-disabled",
            Self::NotSignedIn => "auth/no-current-user",
            Self::ImmutableField(_) => "profile/immutable-field",
            Self::InvalidField { .. } => "profile/invalid-field",
            Self::Credential(_) => "auth/internal-error",
        }
    }

    /// Localized, human-readable message. Distinct per error kind.
    pub fn user_message(&self, locale: Locale) -> String {
        match locale {
            Locale::Es => self.message_es(),
            Locale::En => self.message_en(),
        }
    }

    fn message_es(&self) -> String {
        match self {
            Self::NotFound(_) => "No existe una cuenta con este correo electrónico.".into(),
            Self::InvalidCredential => "La contraseña es incorrecta.".into(),
            Self::AlreadyExists(_) => "Ya existe una cuenta con este correo electrónico.".into(),
            Self::InvalidEmail(_) => "El formato del correo electrónico no es válido.".into(),
            Self::WeakSecret { min_len } => {
                format!("La contraseña debe tener al menos {min_len} caracteres.")
            }
            Self::InvalidRole(_) => "El rol seleccionado no es válido.".into(),
            Self::AccountDisabled(_) => "Esta cuenta está desactivada.".into(),
            Self::NotSignedIn => "Debes iniciar sesión para continuar.".into(),
            Self::ImmutableField(field) => format!("El campo {field} no se puede modificar."),
            Self::InvalidField { field, .. } => format!("El valor del campo {field} no es válido."),
            Self::Credential(_) => "Error al procesar la solicitud. Intenta nuevamente.".into(),
        }
    }

    fn message_en(&self) -> String {
        match self {
            Self::NotFound(_) => "No account exists for this email address.".into(),
            Self::InvalidCredential => "The password is incorrect.".into(),
            Self::AlreadyExists(_) => "An account with this email address already exists.".into(),
            Self::InvalidEmail(_) => "The email address is not valid.".into(),
            Self::WeakSecret { min_len } => {
                format!("The password must be at least {min_len} characters long.")
            }
            Self::InvalidRole(_) => "The selected role is not valid.".into(),
            Self::AccountDisabled(_) => "This account is disabled.".into(),
            Self::NotSignedIn => "You need to sign in to continue.".into(),
            Self::ImmutableField(field) => format!("The field {field} cannot be changed."),
            Self::InvalidField { field, .. } => format!("The value of {field} is not valid."),
            Self::Credential(_) => "Something went wrong. Please try again.".into(),
        }
    }
}
