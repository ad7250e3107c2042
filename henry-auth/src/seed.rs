//! Accounts the directory starts with.

use chrono::{DateTime, TimeZone, Utc};
use henry_common::util::normalize_email;
use henry_common::Role;
use serde_json::Value;

use crate::error::AuthResult;
use crate::password::CredentialHasher;
use crate::record::{ProfileFields, UserRecord};

/// Secret shared by the demo accounts.
pub const SAMPLE_SECRET: &str = "demo123";

/// A plaintext account description, hashed when the directory is built.
#[derive(Debug, Clone)]
pub struct SeedAccount {
    id: String,
    email: String,
    secret: String,
    display_name: String,
    role: Role,
    created_at: Option<DateTime<Utc>>,
    profile: ProfileFields,
}

impl SeedAccount {
    pub fn new(id: impl Into<String>, email: impl Into<String>, secret: impl Into<String>) -> Self {
        let email = normalize_email(&email.into());
        Self {
            id: id.into(),
            display_name: email.clone(),
            email,
            secret: secret.into(),
            role: Role::default(),
            created_at: None,
            profile: ProfileFields::new(),
        }
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Add a free-form profile field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.profile.insert(key.into(), value.into());
        self
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn to_record(&self, hasher: &CredentialHasher) -> AuthResult<UserRecord> {
        let hash = hasher.hash(&self.secret)?;
        let mut record = UserRecord::new(
            self.id.clone(),
            self.email.clone(),
            self.display_name.clone(),
            self.role,
            Some(hash),
        );
        if let Some(at) = self.created_at {
            record.created_at = at;
            record.updated_at = at;
        }
        record.profile = self.profile.clone();
        Ok(record)
    }
}

fn midnight(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// The three demo accounts, one per role, all using [`SAMPLE_SECRET`].
pub fn sample_accounts() -> Vec<SeedAccount> {
    vec![
        SeedAccount::new("prof-001", "profesor@henry.edu", SAMPLE_SECRET)
            .display_name("Dr. María González")
            .role(Role::Teacher)
            .created_at(midnight(2025, 1, 1))
            .field("fullName", "Dr. María González")
            .field("institution", "Universidad Nacional")
            .field("department", "Ciencias de la Computación")
            .field("specialization", "Inteligencia Artificial")
            .field("researchAreas", "Machine Learning, Deep Learning, NLP")
            .field(
                "bio",
                "Profesora e investigadora especializada en IA aplicada a la educación.",
            ),
        SeedAccount::new("student-001", "estudiante@henry.edu", SAMPLE_SECRET)
            .display_name("Carlos Rodríguez")
            .role(Role::Student)
            .created_at(midnight(2025, 1, 15))
            .field("fullName", "Carlos Rodríguez")
            .field("institution", "Universidad Nacional")
            .field("academicLevel", "pregrado")
            .field("studyProgram", "Ingeniería de Sistemas")
            .field(
                "interests",
                "Desarrollo web, inteligencia artificial, bases de datos",
            )
            .field(
                "bio",
                "Estudiante apasionado por la tecnología y el aprendizaje continuo.",
            ),
        SeedAccount::new("admin-001", "admin@henry.edu", SAMPLE_SECRET)
            .display_name("Ana Martínez")
            .role(Role::Admin)
            .created_at(midnight(2024, 12, 1))
            .field("fullName", "Ana Martínez")
            .field("institution", "HENRY Platform")
            .field("department", "Administración de Sistemas")
            .field("bio", "Administradora de la plataforma HENRY."),
    ]
}
