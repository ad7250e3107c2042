//! Canned reply tables, one per role.
//!
//! Each table is an ordered list of rules followed by a default. A rule fires
//! when any of its keywords is a substring of the lower-cased message; rules
//! are tried in table order and the first hit wins. Keywords are lower-case.

use henry_common::Role;

/// One keyword rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Short name for logs and tests
    pub topic: &'static str,
    pub keywords: &'static [&'static str],
    pub template: &'static str,
}

impl Rule {
    /// Whether this rule fires for an already lower-cased message.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// The reply table of one role.
#[derive(Debug, Clone, Copy)]
pub struct RoleTemplates {
    pub rules: &'static [Rule],
    pub default: &'static str,
}

impl RoleTemplates {
    /// First rule that fires, if any.
    pub fn select(&self, lowered: &str) -> Option<&'static Rule> {
        self.rules.iter().find(|rule| rule.matches(lowered))
    }
}

/// Reply table for `role`.
pub fn templates_for(role: Role) -> &'static RoleTemplates {
    match role {
        Role::Teacher => &TEACHER,
        Role::Student => &STUDENT,
        Role::Admin => &ADMIN,
    }
}

/// Greeting shown when a chat opens.
pub fn welcome_message(role: Role, name: &str) -> String {
    match role {
        Role::Teacher => format!(
            "¡Hola {name}! Soy tu asistente de IA especializado en docencia e investigación. \
             Puedo ayudarte con la creación de presentaciones, planificación de clases, \
             generación de cuestionarios, evaluación de estudiantes y apoyo en investigación \
             académica. ¿En qué puedo asistirte hoy?"
        ),
        Role::Student => format!(
            "¡Hola {name}! Soy tu tutor virtual personalizado. Estoy aquí para ayudarte con tus \
             estudios: explicar conceptos difíciles, resolver ejercicios, prepararte para \
             exámenes, resumir material de estudio y cualquier duda académica que tengas. \
             ¿Qué te gustaría aprender hoy?"
        ),
        Role::Admin => format!(
            "¡Hola {name}! Soy tu asistente administrativo para la plataforma HENRY. Puedo \
             ayudarte con análisis de datos, gestión de usuarios, optimización del sistema y \
             generación de reportes. ¿En qué aspecto de la administración necesitas apoyo?"
        ),
    }
}

static TEACHER: RoleTemplates = RoleTemplates {
    rules: &[
        Rule {
            topic: "presentation",
            keywords: &["crear presentación", "presentación", "presentation", "slides"],
            template: "Te ayudo a crear una presentación sobre el tema que necesites. ¿Podrías \
                       especificar el tema, el nivel académico de la audiencia y la duración \
                       aproximada? Puedo sugerir una estructura, generar contenido para cada \
                       diapositiva y recomendar elementos visuales apropiados.",
        },
        Rule {
            topic: "quiz",
            keywords: &["generar cuestionario", "cuestionario", "quiz", "examen", "evaluación"],
            template: "Perfecto, puedo ayudarte a crear un cuestionario personalizado. Necesito \
                       saber: ¿Sobre qué tema será el cuestionario? ¿Qué tipo de preguntas \
                       prefieres (opción múltiple, verdadero/falso, desarrollo)? ¿Cuántas \
                       preguntas necesitas? ¿Cuál es el nivel de dificultad deseado?",
        },
        Rule {
            topic: "planning",
            keywords: &["planificar clase", "clase", "planificar", "lesson", "plan"],
            template: "Excelente idea planificar la clase con anticipación. Para ayudarte mejor, \
                       dime: ¿Cuál es el tema de la clase? ¿Cuánto tiempo durará? ¿Qué nivel \
                       académico tienen los estudiantes? ¿Hay algún objetivo de aprendizaje \
                       específico? Puedo sugerir una estructura, actividades interactivas y \
                       recursos complementarios.",
        },
        Rule {
            topic: "evaluation",
            keywords: &["evaluar estudiantes"],
            template: "Te puedo ayudar a diseñar estrategias de evaluación efectivas. ¿Qué tipo \
                       de evaluación necesitas (formativa, sumativa, diagnóstica)? ¿Cuáles son \
                       los criterios de evaluación? ¿Prefieres rúbricas, escalas de calificación \
                       o evaluación narrativa? Puedo generar instrumentos de evaluación \
                       personalizados.",
        },
        Rule {
            topic: "research",
            keywords: &["investigación", "research", "paper", "artículo"],
            template: "Como asistente de investigación, puedo ayudarte con: análisis de \
                       literatura, diseño de metodologías, interpretación de datos, redacción \
                       académica, y búsqueda de fuentes relevantes. ¿En qué aspecto específico \
                       de tu investigación necesitas apoyo?",
        },
    ],
    default: "Como tu asistente de IA especializado en docencia e investigación, estoy aquí \
              para ayudarte con la creación de contenido educativo, planificación de clases, \
              evaluación de estudiantes, investigación académica y cualquier tarea relacionada \
              con tu labor educativa. ¿En qué puedo asistirte hoy?",
};

static STUDENT: RoleTemplates = RoleTemplates {
    rules: &[
        Rule {
            topic: "explanation",
            keywords: &["explicar concepto", "explicar", "explain", "entender", "understand", "concepto"],
            template: "Te ayudo a entender cualquier concepto de manera clara y sencilla. ¿Qué \
                       tema específico te gustaría que te explique? Puedo usar ejemplos, \
                       analogías y diferentes enfoques para asegurarme de que comprendas \
                       completamente el material.",
        },
        Rule {
            topic: "exercise",
            keywords: &["resolver ejercicio", "ejercicio", "problema", "homework"],
            template: "Perfecto, puedo guiarte paso a paso para resolver ejercicios. Comparte \
                       conmigo el ejercicio o problema que necesitas resolver, y te ayudaré con \
                       una explicación detallada del proceso, mostrándote cada paso y el \
                       razonamiento detrás de la solución.",
        },
        Rule {
            topic: "exam",
            keywords: &["estudiar examen", "examen", "exam", "estudiar", "study", "repasar"],
            template: "Te ayudo a prepararte para tu examen de manera efectiva. ¿Sobre qué \
                       materia es el examen? ¿Qué temas específicos necesitas repasar? Puedo \
                       crear un plan de estudio personalizado, generar preguntas de práctica y \
                       explicarte los conceptos más importantes.",
        },
        Rule {
            topic: "summary",
            keywords: &["resumir material", "resumir", "summary", "resumen", "material"],
            template: "Puedo crear resúmenes claros y concisos de cualquier material de estudio. \
                       Comparte conmigo el contenido que necesitas resumir (texto, PDF, enlaces) \
                       y te proporcionaré un resumen estructurado con los puntos más importantes \
                       y conceptos clave.",
        },
        Rule {
            topic: "homework",
            keywords: &["tareas"],
            template: "Te ayudo con tus tareas académicas proporcionando orientación, \
                       explicaciones y recursos. ¿Qué tipo de tarea necesitas completar? Puedo \
                       ayudarte a entender los requisitos, estructurar tu trabajo y revisar tu \
                       progreso.",
        },
    ],
    default: "Soy tu tutor virtual personalizado, diseñado para apoyarte en tu proceso de \
              aprendizaje. Puedo ayudarte a entender conceptos difíciles, resolver ejercicios, \
              prepararte para exámenes, resumir material de estudio y mucho más. ¿En qué puedo \
              ayudarte hoy?",
};

static ADMIN: RoleTemplates = RoleTemplates {
    rules: &[
        Rule {
            topic: "statistics",
            keywords: &["estadísticas", "stats", "analytics", "datos"],
            template: "Te proporciono análisis detallados sobre el uso de la plataforma: \
                       usuarios activos, cursos más populares, rendimiento del sistema, métricas \
                       de engagement y tendencias de uso. ¿Qué tipo de estadísticas específicas \
                       necesitas revisar?",
        },
        Rule {
            topic: "users",
            keywords: &["gestión usuarios", "usuarios", "users", "gestión", "management"],
            template: "Puedo ayudarte con la administración de usuarios: crear reportes de \
                       actividad, identificar patrones de uso, sugerir mejoras en la experiencia \
                       del usuario y analizar métricas de retención. ¿Qué aspecto de la gestión \
                       de usuarios te interesa?",
        },
        Rule {
            topic: "optimization",
            keywords: &["optimización"],
            template: "Analizo el rendimiento de la plataforma y sugiero optimizaciones basadas \
                       en datos de uso, feedback de usuarios y mejores prácticas. ¿Hay algún \
                       área específica que te gustaría optimizar?",
        },
    ],
    default: "Como asistente administrativo de HENRY, puedo ayudarte con análisis de datos, \
              gestión de usuarios, optimización del sistema, generación de reportes y toma de \
              decisiones basada en métricas. ¿En qué aspecto de la administración necesitas \
              apoyo?",
};
