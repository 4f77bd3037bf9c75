//! Classifier Vocabulary
//!
//! Keyword families for concepts, change types and scope, plus the closed
//! vocabulary of named technical components.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pipeline::types::{ChangeType, Concept, ImpactKind, Scope};

/// Kind of named component in the change request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Database,
    Framework,
    Service,
    Infrastructure,
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => write!(f, "database"),
            Self::Framework => write!(f, "framework"),
            Self::Service => write!(f, "service"),
            Self::Infrastructure => write!(f, "infrastructure"),
        }
    }
}

/// Vocabulary entry for a named component
pub(crate) struct ComponentDef {
    /// Canonical lowercase key
    pub key: &'static str,
    pub display_name: &'static str,
    pub component_type: ComponentType,
    /// Tokens or phrases that name this component (lowercase)
    pub aliases: &'static [&'static str],
    pub impact_kind: ImpactKind,
    /// Path fragments that indicate files touching this component
    pub path_hints: &'static [&'static str],
}

pub(crate) const COMPONENT_VOCABULARY: &[ComponentDef] = &[
    // ===== Databases =====
    ComponentDef {
        key: "postgresql",
        display_name: "PostgreSQL",
        component_type: ComponentType::Database,
        aliases: &["postgresql", "postgres", "psql", "pg"],
        impact_kind: ImpactKind::Schema,
        path_hints: &["postgres", "pg", "sql", "migrations/"],
    },
    ComponentDef {
        key: "mysql",
        display_name: "MySQL",
        component_type: ComponentType::Database,
        aliases: &["mysql", "mariadb"],
        impact_kind: ImpactKind::Schema,
        path_hints: &["mysql", "sql", "migrations/"],
    },
    ComponentDef {
        key: "mongodb",
        display_name: "MongoDB",
        component_type: ComponentType::Database,
        aliases: &["mongodb", "mongo", "mongoose"],
        impact_kind: ImpactKind::Schema,
        path_hints: &["mongo", "models/", "schemas/"],
    },
    ComponentDef {
        key: "redis",
        display_name: "Redis",
        component_type: ComponentType::Database,
        aliases: &["redis"],
        impact_kind: ImpactKind::Schema,
        path_hints: &["redis", "cache"],
    },
    ComponentDef {
        key: "sqlite",
        display_name: "SQLite",
        component_type: ComponentType::Database,
        aliases: &["sqlite", "sqlite3"],
        impact_kind: ImpactKind::Schema,
        path_hints: &["sqlite", "db"],
    },
    ComponentDef {
        key: "dynamodb",
        display_name: "DynamoDB",
        component_type: ComponentType::Database,
        aliases: &["dynamodb", "dynamo"],
        impact_kind: ImpactKind::Schema,
        path_hints: &["dynamo"],
    },
    ComponentDef {
        key: "elasticsearch",
        display_name: "Elasticsearch",
        component_type: ComponentType::Database,
        aliases: &["elasticsearch", "elastic", "opensearch"],
        impact_kind: ImpactKind::Schema,
        path_hints: &["elastic", "search"],
    },
    ComponentDef {
        key: "qdrant",
        display_name: "Qdrant",
        component_type: ComponentType::Database,
        aliases: &["qdrant"],
        impact_kind: ImpactKind::Schema,
        path_hints: &["qdrant", "vector", "embedding"],
    },
    ComponentDef {
        key: "pinecone",
        display_name: "Pinecone",
        component_type: ComponentType::Database,
        aliases: &["pinecone"],
        impact_kind: ImpactKind::Schema,
        path_hints: &["pinecone", "vector", "embedding"],
    },
    ComponentDef {
        key: "weaviate",
        display_name: "Weaviate",
        component_type: ComponentType::Database,
        aliases: &["weaviate"],
        impact_kind: ImpactKind::Schema,
        path_hints: &["weaviate", "vector", "embedding"],
    },
    ComponentDef {
        key: "chroma",
        display_name: "Chroma",
        component_type: ComponentType::Database,
        aliases: &["chroma", "chromadb"],
        impact_kind: ImpactKind::Schema,
        path_hints: &["chroma", "vector", "embedding"],
    },
    ComponentDef {
        key: "milvus",
        display_name: "Milvus",
        component_type: ComponentType::Database,
        aliases: &["milvus"],
        impact_kind: ImpactKind::Schema,
        path_hints: &["milvus", "vector", "embedding"],
    },
    ComponentDef {
        key: "pgvector",
        display_name: "pgvector",
        component_type: ComponentType::Database,
        aliases: &["pgvector"],
        impact_kind: ImpactKind::Schema,
        path_hints: &["pgvector", "vector", "embedding"],
    },
    ComponentDef {
        key: "cassandra",
        display_name: "Cassandra",
        component_type: ComponentType::Database,
        aliases: &["cassandra", "scylla", "scylladb"],
        impact_kind: ImpactKind::Schema,
        path_hints: &["cassandra", "cql"],
    },
    // ===== Frameworks =====
    ComponentDef {
        key: "react",
        display_name: "React",
        component_type: ComponentType::Framework,
        aliases: &["react", "reactjs"],
        impact_kind: ImpactKind::Build,
        path_hints: &["components/", ".jsx", ".tsx"],
    },
    ComponentDef {
        key: "vue",
        display_name: "Vue",
        component_type: ComponentType::Framework,
        aliases: &["vue", "vuejs", "nuxt"],
        impact_kind: ImpactKind::Build,
        path_hints: &[".vue", "components/"],
    },
    ComponentDef {
        key: "angular",
        display_name: "Angular",
        component_type: ComponentType::Framework,
        aliases: &["angular"],
        impact_kind: ImpactKind::Build,
        path_hints: &[".component.ts", ".module.ts"],
    },
    ComponentDef {
        key: "svelte",
        display_name: "Svelte",
        component_type: ComponentType::Framework,
        aliases: &["svelte", "sveltekit"],
        impact_kind: ImpactKind::Build,
        path_hints: &[".svelte"],
    },
    ComponentDef {
        key: "nextjs",
        display_name: "Next.js",
        component_type: ComponentType::Framework,
        aliases: &["next.js", "nextjs"],
        impact_kind: ImpactKind::Build,
        path_hints: &["pages/", "app/", "next.config"],
    },
    ComponentDef {
        key: "express",
        display_name: "Express",
        component_type: ComponentType::Framework,
        aliases: &["express", "expressjs"],
        impact_kind: ImpactKind::Api,
        path_hints: &["routes/", "middleware", "server"],
    },
    ComponentDef {
        key: "nestjs",
        display_name: "NestJS",
        component_type: ComponentType::Framework,
        aliases: &["nestjs", "nest.js"],
        impact_kind: ImpactKind::Api,
        path_hints: &[".controller.", ".module.", ".service."],
    },
    ComponentDef {
        key: "django",
        display_name: "Django",
        component_type: ComponentType::Framework,
        aliases: &["django"],
        impact_kind: ImpactKind::Api,
        path_hints: &["views", "urls.py", "models.py"],
    },
    ComponentDef {
        key: "flask",
        display_name: "Flask",
        component_type: ComponentType::Framework,
        aliases: &["flask"],
        impact_kind: ImpactKind::Api,
        path_hints: &["app.py", "routes", "blueprints"],
    },
    ComponentDef {
        key: "fastapi",
        display_name: "FastAPI",
        component_type: ComponentType::Framework,
        aliases: &["fastapi"],
        impact_kind: ImpactKind::Api,
        path_hints: &["routers/", "main.py", "api/"],
    },
    ComponentDef {
        key: "spring",
        display_name: "Spring Boot",
        component_type: ComponentType::Framework,
        aliases: &["spring boot", "spring", "springboot"],
        impact_kind: ImpactKind::Api,
        path_hints: &["controller", ".java"],
    },
    ComponentDef {
        key: "rails",
        display_name: "Rails",
        component_type: ComponentType::Framework,
        aliases: &["rails", "ruby on rails"],
        impact_kind: ImpactKind::Api,
        path_hints: &["app/controllers", "app/models", "config/routes.rb"],
    },
    ComponentDef {
        key: "langchain",
        display_name: "LangChain",
        component_type: ComponentType::Framework,
        aliases: &["langchain"],
        impact_kind: ImpactKind::Logic,
        path_hints: &["chain", "llm", "agent"],
    },
    // ===== Services =====
    ComponentDef {
        key: "stripe",
        display_name: "Stripe",
        component_type: ComponentType::Service,
        aliases: &["stripe"],
        impact_kind: ImpactKind::Config,
        path_hints: &["stripe", "payment", "billing", "checkout"],
    },
    ComponentDef {
        key: "auth0",
        display_name: "Auth0",
        component_type: ComponentType::Service,
        aliases: &["auth0"],
        impact_kind: ImpactKind::Config,
        path_hints: &["auth", "login", "session"],
    },
    ComponentDef {
        key: "okta",
        display_name: "Okta",
        component_type: ComponentType::Service,
        aliases: &["okta"],
        impact_kind: ImpactKind::Config,
        path_hints: &["auth", "sso", "login"],
    },
    ComponentDef {
        key: "openai",
        display_name: "OpenAI",
        component_type: ComponentType::Service,
        aliases: &["openai", "gpt", "chatgpt"],
        impact_kind: ImpactKind::Logic,
        path_hints: &["openai", "llm", "prompt"],
    },
    ComponentDef {
        key: "anthropic",
        display_name: "Anthropic",
        component_type: ComponentType::Service,
        aliases: &["anthropic"],
        impact_kind: ImpactKind::Logic,
        path_hints: &["anthropic", "llm", "prompt"],
    },
    ComponentDef {
        key: "twilio",
        display_name: "Twilio",
        component_type: ComponentType::Service,
        aliases: &["twilio"],
        impact_kind: ImpactKind::Config,
        path_hints: &["twilio", "sms", "notification"],
    },
    ComponentDef {
        key: "sendgrid",
        display_name: "SendGrid",
        component_type: ComponentType::Service,
        aliases: &["sendgrid"],
        impact_kind: ImpactKind::Config,
        path_hints: &["sendgrid", "mail", "email"],
    },
    ComponentDef {
        key: "kafka",
        display_name: "Kafka",
        component_type: ComponentType::Service,
        aliases: &["kafka"],
        impact_kind: ImpactKind::Infra,
        path_hints: &["kafka", "consumer", "producer", "event"],
    },
    ComponentDef {
        key: "rabbitmq",
        display_name: "RabbitMQ",
        component_type: ComponentType::Service,
        aliases: &["rabbitmq", "rabbit", "amqp"],
        impact_kind: ImpactKind::Infra,
        path_hints: &["rabbit", "amqp", "queue"],
    },
    ComponentDef {
        key: "s3",
        display_name: "Amazon S3",
        component_type: ComponentType::Service,
        aliases: &["s3"],
        impact_kind: ImpactKind::Config,
        path_hints: &["s3", "upload", "storage"],
    },
    ComponentDef {
        key: "firebase",
        display_name: "Firebase",
        component_type: ComponentType::Service,
        aliases: &["firebase", "firestore"],
        impact_kind: ImpactKind::Config,
        path_hints: &["firebase", "firestore"],
    },
    // ===== Infrastructure =====
    ComponentDef {
        key: "docker",
        display_name: "Docker",
        component_type: ComponentType::Infrastructure,
        aliases: &["docker", "dockerfile", "containers", "containerize"],
        impact_kind: ImpactKind::Infra,
        path_hints: &["dockerfile", "docker-compose", ".dockerignore"],
    },
    ComponentDef {
        key: "kubernetes",
        display_name: "Kubernetes",
        component_type: ComponentType::Infrastructure,
        aliases: &["kubernetes", "k8s", "helm", "eks", "gke", "aks"],
        impact_kind: ImpactKind::Infra,
        path_hints: &["k8s", "kubernetes", "helm", "chart"],
    },
    ComponentDef {
        key: "terraform",
        display_name: "Terraform",
        component_type: ComponentType::Infrastructure,
        aliases: &["terraform", "iac"],
        impact_kind: ImpactKind::Infra,
        path_hints: &[".tf", "terraform", "infra/"],
    },
    ComponentDef {
        key: "aws",
        display_name: "AWS",
        component_type: ComponentType::Infrastructure,
        aliases: &["aws", "amazon web services"],
        impact_kind: ImpactKind::Infra,
        path_hints: &["aws", "cdk", "cloudformation"],
    },
    ComponentDef {
        key: "gcp",
        display_name: "Google Cloud",
        component_type: ComponentType::Infrastructure,
        aliases: &["gcp", "google cloud"],
        impact_kind: ImpactKind::Infra,
        path_hints: &["gcp", "gcloud", "app.yaml"],
    },
    ComponentDef {
        key: "azure",
        display_name: "Azure",
        component_type: ComponentType::Infrastructure,
        aliases: &["azure"],
        impact_kind: ImpactKind::Infra,
        path_hints: &["azure"],
    },
    ComponentDef {
        key: "lambda",
        display_name: "AWS Lambda",
        component_type: ComponentType::Infrastructure,
        aliases: &["lambda", "lambdas"],
        impact_kind: ImpactKind::Infra,
        path_hints: &["lambda", "functions/", "serverless"],
    },
    ComponentDef {
        key: "github-actions",
        display_name: "GitHub Actions",
        component_type: ComponentType::Infrastructure,
        aliases: &["github actions"],
        impact_kind: ImpactKind::Build,
        path_hints: &[".github/workflows/"],
    },
    ComponentDef {
        key: "jenkins",
        display_name: "Jenkins",
        component_type: ComponentType::Infrastructure,
        aliases: &["jenkins"],
        impact_kind: ImpactKind::Build,
        path_hints: &["jenkinsfile", "ci/"],
    },
    ComponentDef {
        key: "nginx",
        display_name: "Nginx",
        component_type: ComponentType::Infrastructure,
        aliases: &["nginx"],
        impact_kind: ImpactKind::Config,
        path_hints: &["nginx"],
    },
];

/// Look up a vocabulary entry by canonical key
pub(crate) fn component_def(key: &str) -> Option<&'static ComponentDef> {
    COMPONENT_VOCABULARY.iter().find(|def| def.key == key)
}

// =============================================================================
// Keyword Families
// =============================================================================

/// Concept keyword families. A concept is present when its regex matches
/// anywhere in the text (prefix-anchored, so partial tokens count).
pub(crate) const CONCEPT_PATTERNS: &[(Concept, &str)] = &[
    (
        Concept::Database,
        r"(?i)\b(?:database|db\b|dbs\b|sql|postgres|mysql|mongo|redis|schema|tables?\b|vector|embedding|qdrant|pinecone|weaviate|chroma|milvus|orm\b|quer(?:y|ies)|data ?store|persistence)",
    ),
    (
        Concept::Api,
        r"(?i)\b(?:api|endpoint|rest\b|restful|graphql|grpc|routes?\b|webhook|http|openapi|swagger)",
    ),
    (
        Concept::Security,
        r"(?i)\b(?:secur|auth|login|password|encrypt|permission|rbac|oauth|sso\b|jwt|vulnerab|complian|gdpr|hipaa|pci|token|access control)",
    ),
    (
        Concept::Frontend,
        r"(?i)\b(?:frontend|front-end|front end|ui\b|ux\b|user interface|react|vue|angular|svelte|next\.?js|components?\b|pages?\b|dashboard|css|button|forms?\b|responsive)",
    ),
    (
        Concept::Backend,
        r"(?i)\b(?:backend|back-end|back end|server|services?\b|microservice|workers?\b|business logic|express|django|flask|fastapi|spring)",
    ),
    (
        Concept::Infrastructure,
        r"(?i)\b(?:infrastructure|infra\b|deploy|docker|kubernetes|k8s|container|cloud|aws|gcp|azure|terraform|ci/cd|ci\b|pipelines?\b|serverless|lambda|hosting)",
    ),
    (
        Concept::Migration,
        r"(?i)\b(?:migrat|move from|moving from|switch(?:ing)? (?:from|to)|replac|port(?:ing)? (?:to|from)|transition)",
    ),
    (
        Concept::Performance,
        r"(?i)\b(?:performance|perf\b|latency|slow|speed|faster|optimi[sz]|cach|throughput|scal|bottleneck)",
    ),
    (
        Concept::Integration,
        r"(?i)\b(?:integrat|third-party|third party|webhook|connect|sync|plugin|sdk\b|external service|stripe|twilio|sendgrid|openai)",
    ),
    (
        Concept::Testing,
        r"(?i)\b(?:test|qa\b|coverage|e2e|regression|quality assurance)",
    ),
];

/// Change-type keyword families in resolution order. First match wins.
pub(crate) const CHANGE_TYPE_PATTERNS: &[(ChangeType, &str)] = &[
    (
        ChangeType::Migration,
        r"(?i)\b(?:migrat\w*|move from|moving from|switch(?:ing)? (?:from|to)|replac\w*|port(?:ing)? (?:to|from)|transition\w*)",
    ),
    (
        ChangeType::Feature,
        r"(?i)\b(?:add|adding|adds|new|implement\w*|build|building|create|creating|introduc\w*|feature\w*|support for|enable)\b",
    ),
    (
        ChangeType::Bugfix,
        r"(?i)\b(?:fix\w*|bugs?\b|issue|errors?\b|broken|crash\w*|defect|hotfix)",
    ),
    (
        ChangeType::Optimization,
        r"(?i)\b(?:optimi[sz]\w*|improve performance|speed up|faster|reduce latency|performance)",
    ),
    (
        ChangeType::Refactoring,
        r"(?i)\b(?:refactor\w*|restructur\w*|clean ?up|reorganiz\w*|decoupl\w*|simplif\w*)",
    ),
    (
        ChangeType::Integration,
        r"(?i)\b(?:integrat\w*|connect\w* (?:to|with)|sync\w* with|hook into)",
    ),
    (
        ChangeType::Upgrade,
        r"(?i)\b(?:upgrad\w*|bump\w*|update (?:to|the) (?:latest|version)|latest version|version \d)",
    ),
    (
        ChangeType::Scaling,
        r"(?i)\b(?:scal\w*|high availability|load balanc\w*|horizontal\w*|replica\w*|throughput)",
    ),
];

/// Scope keyword families in resolution order over the `medium` default
pub(crate) const SCOPE_PATTERNS: &[(Scope, &str)] = &[
    (
        Scope::Large,
        r"(?i)\b(?:complete|entire|whole|full\b|overhaul|rewrite|re-?architect\w*|all services|platform-wide|system-wide|company-wide|major|across the)",
    ),
    (
        Scope::Small,
        r"(?i)\b(?:minor|small|simple|quick|tweak|typo|single|one-line|trivial|cosmetic)",
    ),
];

/// Words never kept as keywords
pub(crate) const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "into", "that", "this", "our", "are", "was", "will",
    "should", "would", "can", "could", "have", "has", "had", "been", "being", "all", "any", "but",
    "not", "use", "using", "via", "its", "their", "them", "then", "than", "also", "need", "needs",
    "want", "wants", "like", "just", "more", "most", "some", "such", "each", "other", "about",
    "over", "under", "which", "when", "where", "what", "who", "how", "why", "there", "here",
    "these", "those", "make", "ensure", "current", "currently", "existing", "please", "we're",
    "it's", "you", "your", "they", "must", "may", "might", "so", "out", "per", "able",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_keys_are_unique() {
        let mut keys: Vec<_> = COMPONENT_VOCABULARY.iter().map(|d| d.key).collect();
        keys.sort();
        let before = keys.len();
        keys.dedup();
        assert_eq!(before, keys.len());
    }

    #[test]
    fn test_aliases_are_lowercase() {
        for def in COMPONENT_VOCABULARY {
            for alias in def.aliases {
                assert_eq!(*alias, alias.to_lowercase(), "alias {} of {}", alias, def.key);
            }
        }
    }

    #[test]
    fn test_change_type_order_is_fixed() {
        let order: Vec<_> = CHANGE_TYPE_PATTERNS.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            order,
            vec![
                ChangeType::Migration,
                ChangeType::Feature,
                ChangeType::Bugfix,
                ChangeType::Optimization,
                ChangeType::Refactoring,
                ChangeType::Integration,
                ChangeType::Upgrade,
                ChangeType::Scaling,
            ]
        );
    }
}
