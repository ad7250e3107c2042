//! Structured teaching content: presentations, quizzes, lesson plans, summaries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AssistantError;

const DEFAULT_PRESENTATION_DURATION: &str = "45 minutos";
const DEFAULT_LESSON_DURATION: &str = "90 minutos";
const DEFAULT_AUDIENCE: &str = "Estudiantes universitarios";
const DEFAULT_DIFFICULTY: &str = "intermedio";

/// Kinds of content the generator can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Presentation,
    Quiz,
    LessonPlan,
    Summary,
}

impl ContentKind {
    pub fn all() -> &'static [ContentKind] {
        &[
            ContentKind::Presentation,
            ContentKind::Quiz,
            ContentKind::LessonPlan,
            ContentKind::Summary,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Presentation => "presentation",
            Self::Quiz => "quiz",
            Self::LessonPlan => "lesson_plan",
            Self::Summary => "summary",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AssistantError::UnsupportedKind(s.to_string()))
    }
}

/// Optional knobs. Unset values fall back to per-kind defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl GenerationParams {
    fn duration_or(&self, fallback: &str) -> String {
        non_blank(&self.duration).unwrap_or(fallback).to_string()
    }

    fn audience(&self) -> String {
        non_blank(&self.audience).unwrap_or(DEFAULT_AUDIENCE).to_string()
    }

    fn difficulty(&self) -> String {
        non_blank(&self.difficulty)
            .unwrap_or(DEFAULT_DIFFICULTY)
            .to_string()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: u32,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub title: String,
    pub slides: Vec<Slide>,
    pub duration: String,
    pub audience: String,
    pub suggestions: Vec<String>,
}

/// A quiz question, tagged by its answer format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Question {
    MultipleChoice {
        id: u32,
        question: String,
        options: Vec<String>,
        correct: usize,
        explanation: String,
    },
    TrueFalse {
        id: u32,
        question: String,
        correct: bool,
        explanation: String,
    },
    ShortAnswer {
        id: u32,
        question: String,
        sample_answer: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub title: String,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub estimated_time: String,
    pub difficulty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonPhase {
    pub phase: String,
    pub duration: String,
    pub activities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonPlan {
    pub title: String,
    pub duration: String,
    pub objectives: Vec<String>,
    pub structure: Vec<LessonPhase>,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub title: String,
    pub key_points: Vec<String>,
    pub main_concepts: Vec<String>,
    pub recommendations: Vec<String>,
    pub estimated_reading_time: String,
}

/// Payload of a generation result. An unsupported kind still produces a
/// body, carrying the error text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentBody {
    Presentation(Presentation),
    Quiz(Quiz),
    LessonPlan(LessonPlan),
    Summary(Summary),
    Error { error: String },
}

impl ContentBody {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Envelope returned by content generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub success: bool,
    pub content: ContentBody,
    /// Requested kind, verbatim
    #[serde(rename = "type")]
    pub kind: String,
    pub topic: String,
    pub timestamp: DateTime<Utc>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Build the content for a kind tag. Never fails: an unknown tag yields a
/// successful envelope whose body is an error.
pub fn generate(kind: &str, topic: &str, params: &GenerationParams) -> GeneratedContent {
    let content = match kind.parse::<ContentKind>() {
        Ok(kind) => build(kind, topic, params),
        Err(err) => {
            tracing::warn!(kind = %kind, "Unsupported content kind requested");
            ContentBody::Error {
                error: err.user_message(henry_common::Locale::Es),
            }
        }
    };

    GeneratedContent {
        success: true,
        content,
        kind: kind.to_string(),
        topic: topic.to_string(),
        timestamp: Utc::now(),
    }
}

/// Build the body for a known kind.
pub fn build(kind: ContentKind, topic: &str, params: &GenerationParams) -> ContentBody {
    match kind {
        ContentKind::Presentation => ContentBody::Presentation(presentation(topic, params)),
        ContentKind::Quiz => ContentBody::Quiz(quiz(topic, params)),
        ContentKind::LessonPlan => ContentBody::LessonPlan(lesson_plan(topic, params)),
        ContentKind::Summary => ContentBody::Summary(summary(topic)),
    }
}

fn presentation(topic: &str, params: &GenerationParams) -> Presentation {
    let slide = |id: u32, title: String, content: String, kind: &str| Slide {
        id,
        title,
        content,
        kind: kind.to_string(),
    };

    let slides = vec![
        slide(
            1,
            format!("Introducción a {topic}"),
            format!(
                "Bienvenidos al estudio de {topic}. En esta presentación exploraremos los \
                 conceptos fundamentales y aplicaciones prácticas."
            ),
            "intro",
        ),
        slide(
            2,
            "Objetivos de Aprendizaje".into(),
            format!(
                "Al finalizar esta sesión, los estudiantes podrán:\n\
                 • Comprender los conceptos básicos de {topic}\n\
                 • Identificar aplicaciones prácticas\n\
                 • Analizar casos de estudio relevantes"
            ),
            "objectives",
        ),
        slide(
            3,
            "Conceptos Fundamentales".into(),
            format!(
                "Los pilares fundamentales de {topic} incluyen varios aspectos teóricos y \
                 prácticos que debemos dominar para una comprensión completa."
            ),
            "content",
        ),
        slide(
            4,
            "Aplicaciones Prácticas".into(),
            format!(
                "{topic} tiene múltiples aplicaciones en el mundo real, desde casos académicos \
                 hasta implementaciones industriales."
            ),
            "applications",
        ),
        slide(
            5,
            "Conclusiones".into(),
            format!(
                "Hemos explorado los aspectos más importantes de {topic}. Las próximas sesiones \
                 profundizarán en temas específicos."
            ),
            "conclusion",
        ),
    ];

    Presentation {
        title: format!("Presentación: {topic}"),
        slides,
        duration: params.duration_or(DEFAULT_PRESENTATION_DURATION),
        audience: params.audience(),
        suggestions: strings(&[
            "Incluir ejemplos visuales para cada concepto",
            "Agregar actividades interactivas entre secciones",
            "Preparar preguntas para fomentar la participación",
        ]),
    }
}

fn quiz(topic: &str, params: &GenerationParams) -> Quiz {
    let questions = vec![
        Question::MultipleChoice {
            id: 1,
            question: format!("¿Cuál es el concepto más importante relacionado con {topic}?"),
            options: strings(&["Opción A", "Opción B", "Opción C", "Opción D"]),
            correct: 0,
            explanation: format!(
                "La respuesta correcta se basa en los fundamentos teóricos de {topic}."
            ),
        },
        Question::TrueFalse {
            id: 2,
            question: format!("{topic} tiene aplicaciones prácticas en múltiples disciplinas."),
            correct: true,
            explanation: format!(
                "Verdadero. {topic} es un campo interdisciplinario con amplia aplicabilidad."
            ),
        },
        Question::ShortAnswer {
            id: 3,
            question: format!("Explica brevemente la importancia de {topic} en el contexto actual."),
            sample_answer: format!(
                "{topic} es relevante porque proporciona herramientas y metodologías esenciales \
                 para abordar desafíos contemporáneos."
            ),
        },
    ];

    Quiz {
        title: format!("Cuestionario: {topic}"),
        total_questions: questions.len(),
        questions,
        estimated_time: "15-20 minutos".into(),
        difficulty: params.difficulty(),
    }
}

fn lesson_plan(topic: &str, params: &GenerationParams) -> LessonPlan {
    LessonPlan {
        title: format!("Plan de Clase: {topic}"),
        duration: params.duration_or(DEFAULT_LESSON_DURATION),
        objectives: vec![
            format!("Introducir los conceptos fundamentales de {topic}"),
            "Fomentar la participación activa de los estudiantes".into(),
            "Aplicar conocimientos a través de ejercicios prácticos".into(),
        ],
        structure: vec![
            phase(
                "Introducción",
                "15 min",
                &["Presentación del tema", "Activación de conocimientos previos"],
            ),
            phase(
                "Desarrollo",
                "50 min",
                &["Explicación teórica", "Ejemplos prácticos", "Discusión grupal"],
            ),
            phase(
                "Cierre",
                "20 min",
                &[
                    "Síntesis de conceptos",
                    "Evaluación formativa",
                    "Asignación de tareas",
                ],
            ),
            phase("Evaluación", "5 min", &["Retroalimentación de la sesión"]),
        ],
        resources: strings(&[
            "Presentación digital",
            "Material de lectura complementario",
            "Ejercicios prácticos",
            "Plataforma HENRY para seguimiento",
        ]),
    }
}

fn phase(name: &str, duration: &str, activities: &[&str]) -> LessonPhase {
    LessonPhase {
        phase: name.to_string(),
        duration: duration.to_string(),
        activities: strings(activities),
    }
}

fn summary(topic: &str) -> Summary {
    Summary {
        title: format!("Resumen: {topic}"),
        key_points: vec![
            format!("{topic} es un área de conocimiento fundamental en el contexto educativo actual"),
            "Los conceptos principales incluyen aspectos teóricos y aplicaciones prácticas".into(),
            "La comprensión profunda requiere estudio sistemático y práctica constante".into(),
            "Las aplicaciones se extienden a múltiples disciplinas y contextos profesionales".into(),
        ],
        main_concepts: strings(&[
            "Fundamentos teóricos",
            "Metodologías de aplicación",
            "Casos de estudio relevantes",
            "Tendencias futuras",
        ]),
        recommendations: strings(&[
            "Revisar material complementario",
            "Practicar con ejercicios adicionales",
            "Participar en discusiones grupales",
            "Buscar aplicaciones en proyectos personales",
        ]),
        estimated_reading_time: "10-15 minutos".into(),
    }
}
