//! Profiler Rule Registry
//!
//! Static detection tables for the repository profiler. Every rule is
//! many-to-one: a fact is confirmed by any of its signals, and the number of
//! confirming signals becomes the fact's evidence count.

use serde::{Deserialize, Serialize};

/// Kind of technology a fact describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechType {
    Language,
    Framework,
    Database,
    Infrastructure,
    Testing,
    Tooling,
}

/// Which side of an application a framework serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tier {
    Frontend,
    Backend,
    Data,
    None,
}

/// Tech-stack rule definition for the registry
pub(crate) struct TechRule {
    pub name: &'static str,
    pub tech_type: TechType,
    pub tier: Tier,
    /// Dependency names (exact, lowercase)
    pub dependencies: &'static [&'static str],
    /// File extensions without the dot
    pub extensions: &'static [&'static str],
    /// Exact file names (lowercase)
    pub filenames: &'static [&'static str],
    /// Path fragments matched against the lowercased path
    pub path_fragments: &'static [&'static str],
}

pub(crate) const TECH_RULES: &[TechRule] = &[
    // ===== Languages =====
    TechRule {
        name: "JavaScript",
        tech_type: TechType::Language,
        tier: Tier::None,
        dependencies: &[],
        extensions: &["js", "mjs", "cjs", "jsx"],
        filenames: &["package.json"],
        path_fragments: &[],
    },
    TechRule {
        name: "TypeScript",
        tech_type: TechType::Language,
        tier: Tier::None,
        dependencies: &["typescript", "ts-node"],
        extensions: &["ts", "tsx"],
        filenames: &["tsconfig.json"],
        path_fragments: &[],
    },
    TechRule {
        name: "Python",
        tech_type: TechType::Language,
        tier: Tier::None,
        dependencies: &[],
        extensions: &["py"],
        filenames: &["requirements.txt", "pyproject.toml", "setup.py", "pipfile"],
        path_fragments: &[],
    },
    TechRule {
        name: "Rust",
        tech_type: TechType::Language,
        tier: Tier::None,
        dependencies: &[],
        extensions: &["rs"],
        filenames: &["cargo.toml"],
        path_fragments: &[],
    },
    TechRule {
        name: "Go",
        tech_type: TechType::Language,
        tier: Tier::None,
        dependencies: &[],
        extensions: &["go"],
        filenames: &["go.mod"],
        path_fragments: &[],
    },
    TechRule {
        name: "Java",
        tech_type: TechType::Language,
        tier: Tier::None,
        dependencies: &[],
        extensions: &["java", "kt"],
        filenames: &["pom.xml", "build.gradle", "build.gradle.kts"],
        path_fragments: &[],
    },
    TechRule {
        name: "Ruby",
        tech_type: TechType::Language,
        tier: Tier::None,
        dependencies: &[],
        extensions: &["rb"],
        filenames: &["gemfile"],
        path_fragments: &[],
    },
    // ===== Backend Frameworks =====
    TechRule {
        name: "Express",
        tech_type: TechType::Framework,
        tier: Tier::Backend,
        dependencies: &["express"],
        extensions: &[],
        filenames: &[],
        path_fragments: &[],
    },
    TechRule {
        name: "NestJS",
        tech_type: TechType::Framework,
        tier: Tier::Backend,
        dependencies: &["@nestjs/core", "@nestjs/common"],
        extensions: &[],
        filenames: &["nest-cli.json"],
        path_fragments: &[],
    },
    TechRule {
        name: "Fastify",
        tech_type: TechType::Framework,
        tier: Tier::Backend,
        dependencies: &["fastify"],
        extensions: &[],
        filenames: &[],
        path_fragments: &[],
    },
    TechRule {
        name: "Django",
        tech_type: TechType::Framework,
        tier: Tier::Backend,
        dependencies: &["django", "djangorestframework"],
        extensions: &[],
        filenames: &["manage.py"],
        path_fragments: &[],
    },
    TechRule {
        name: "Flask",
        tech_type: TechType::Framework,
        tier: Tier::Backend,
        dependencies: &["flask"],
        extensions: &[],
        filenames: &[],
        path_fragments: &[],
    },
    TechRule {
        name: "FastAPI",
        tech_type: TechType::Framework,
        tier: Tier::Backend,
        dependencies: &["fastapi"],
        extensions: &[],
        filenames: &[],
        path_fragments: &[],
    },
    TechRule {
        name: "Rails",
        tech_type: TechType::Framework,
        tier: Tier::Backend,
        dependencies: &["rails"],
        extensions: &[],
        filenames: &[],
        path_fragments: &["config/routes.rb"],
    },
    TechRule {
        name: "Spring Boot",
        tech_type: TechType::Framework,
        tier: Tier::Backend,
        dependencies: &["spring-boot-starter-web", "org.springframework.boot"],
        extensions: &[],
        filenames: &["application.properties", "application.yml"],
        path_fragments: &[],
    },
    TechRule {
        name: "Axum",
        tech_type: TechType::Framework,
        tier: Tier::Backend,
        dependencies: &["axum"],
        extensions: &[],
        filenames: &[],
        path_fragments: &[],
    },
    TechRule {
        name: "Actix Web",
        tech_type: TechType::Framework,
        tier: Tier::Backend,
        dependencies: &["actix-web"],
        extensions: &[],
        filenames: &[],
        path_fragments: &[],
    },
    TechRule {
        name: "Gin",
        tech_type: TechType::Framework,
        tier: Tier::Backend,
        dependencies: &["github.com/gin-gonic/gin"],
        extensions: &[],
        filenames: &[],
        path_fragments: &[],
    },
    // ===== Frontend Frameworks =====
    TechRule {
        name: "React",
        tech_type: TechType::Framework,
        tier: Tier::Frontend,
        dependencies: &["react", "react-dom"],
        extensions: &[],
        filenames: &[],
        path_fragments: &[],
    },
    TechRule {
        name: "Next.js",
        tech_type: TechType::Framework,
        tier: Tier::Frontend,
        dependencies: &["next"],
        extensions: &[],
        filenames: &["next.config.js", "next.config.mjs", "next.config.ts"],
        path_fragments: &[],
    },
    TechRule {
        name: "Vue",
        tech_type: TechType::Framework,
        tier: Tier::Frontend,
        dependencies: &["vue", "nuxt"],
        extensions: &["vue"],
        filenames: &["vue.config.js", "nuxt.config.js", "nuxt.config.ts"],
        path_fragments: &[],
    },
    TechRule {
        name: "Angular",
        tech_type: TechType::Framework,
        tier: Tier::Frontend,
        dependencies: &["@angular/core"],
        extensions: &[],
        filenames: &["angular.json"],
        path_fragments: &[],
    },
    TechRule {
        name: "Svelte",
        tech_type: TechType::Framework,
        tier: Tier::Frontend,
        dependencies: &["svelte", "@sveltejs/kit"],
        extensions: &["svelte"],
        filenames: &["svelte.config.js"],
        path_fragments: &[],
    },
    // ===== Data Frameworks =====
    TechRule {
        name: "Pandas",
        tech_type: TechType::Framework,
        tier: Tier::Data,
        dependencies: &["pandas", "polars"],
        extensions: &["ipynb"],
        filenames: &[],
        path_fragments: &[],
    },
    TechRule {
        name: "Apache Spark",
        tech_type: TechType::Framework,
        tier: Tier::Data,
        dependencies: &["pyspark"],
        extensions: &[],
        filenames: &[],
        path_fragments: &[],
    },
    TechRule {
        name: "Airflow",
        tech_type: TechType::Framework,
        tier: Tier::Data,
        dependencies: &["apache-airflow"],
        extensions: &[],
        filenames: &[],
        path_fragments: &["dags/"],
    },
    TechRule {
        name: "dbt",
        tech_type: TechType::Framework,
        tier: Tier::Data,
        dependencies: &["dbt-core"],
        extensions: &[],
        filenames: &["dbt_project.yml"],
        path_fragments: &[],
    },
    // ===== ORMs =====
    TechRule {
        name: "Prisma",
        tech_type: TechType::Framework,
        tier: Tier::None,
        dependencies: &["prisma", "@prisma/client"],
        extensions: &["prisma"],
        filenames: &[],
        path_fragments: &[],
    },
    TechRule {
        name: "Sequelize",
        tech_type: TechType::Framework,
        tier: Tier::None,
        dependencies: &["sequelize"],
        extensions: &[],
        filenames: &[".sequelizerc"],
        path_fragments: &[],
    },
    TechRule {
        name: "TypeORM",
        tech_type: TechType::Framework,
        tier: Tier::None,
        dependencies: &["typeorm"],
        extensions: &[],
        filenames: &["ormconfig.json"],
        path_fragments: &[],
    },
    TechRule {
        name: "SQLAlchemy",
        tech_type: TechType::Framework,
        tier: Tier::None,
        dependencies: &["sqlalchemy", "alembic"],
        extensions: &[],
        filenames: &["alembic.ini"],
        path_fragments: &[],
    },
    // ===== Databases =====
    TechRule {
        name: "PostgreSQL",
        tech_type: TechType::Database,
        tier: Tier::None,
        dependencies: &["pg", "psycopg2", "psycopg2-binary", "psycopg", "asyncpg", "tokio-postgres"],
        extensions: &[],
        filenames: &[],
        path_fragments: &["postgres"],
    },
    TechRule {
        name: "MySQL",
        tech_type: TechType::Database,
        tier: Tier::None,
        dependencies: &["mysql", "mysql2", "pymysql", "mysqlclient"],
        extensions: &[],
        filenames: &[],
        path_fragments: &["mysql"],
    },
    TechRule {
        name: "MongoDB",
        tech_type: TechType::Database,
        tier: Tier::None,
        dependencies: &["mongodb", "mongoose", "pymongo", "motor"],
        extensions: &[],
        filenames: &[],
        path_fragments: &["mongo"],
    },
    TechRule {
        name: "Redis",
        tech_type: TechType::Database,
        tier: Tier::None,
        dependencies: &["redis", "ioredis", "redis-py"],
        extensions: &[],
        filenames: &[],
        path_fragments: &["redis"],
    },
    TechRule {
        name: "SQLite",
        tech_type: TechType::Database,
        tier: Tier::None,
        dependencies: &["sqlite3", "better-sqlite3", "rusqlite"],
        extensions: &["sqlite", "db"],
        filenames: &[],
        path_fragments: &[],
    },
    TechRule {
        name: "Elasticsearch",
        tech_type: TechType::Database,
        tier: Tier::None,
        dependencies: &["elasticsearch", "@elastic/elasticsearch"],
        extensions: &[],
        filenames: &[],
        path_fragments: &["elastic"],
    },
    TechRule {
        name: "Qdrant",
        tech_type: TechType::Database,
        tier: Tier::None,
        dependencies: &["qdrant-client", "qdrant_client", "@qdrant/js-client-rest"],
        extensions: &[],
        filenames: &[],
        path_fragments: &["qdrant"],
    },
    TechRule {
        name: "Pinecone",
        tech_type: TechType::Database,
        tier: Tier::None,
        dependencies: &["pinecone-client", "pinecone", "@pinecone-database/pinecone"],
        extensions: &[],
        filenames: &[],
        path_fragments: &["pinecone"],
    },
    TechRule {
        name: "Weaviate",
        tech_type: TechType::Database,
        tier: Tier::None,
        dependencies: &["weaviate-client", "weaviate-ts-client"],
        extensions: &[],
        filenames: &[],
        path_fragments: &["weaviate"],
    },
    TechRule {
        name: "Chroma",
        tech_type: TechType::Database,
        tier: Tier::None,
        dependencies: &["chromadb"],
        extensions: &[],
        filenames: &[],
        path_fragments: &["chroma"],
    },
    // ===== Infrastructure =====
    TechRule {
        name: "Docker",
        tech_type: TechType::Infrastructure,
        tier: Tier::None,
        dependencies: &[],
        extensions: &[],
        filenames: &[
            "dockerfile",
            "docker-compose.yml",
            "docker-compose.yaml",
            "compose.yaml",
            ".dockerignore",
        ],
        path_fragments: &[],
    },
    TechRule {
        name: "Kubernetes",
        tech_type: TechType::Infrastructure,
        tier: Tier::None,
        dependencies: &[],
        extensions: &[],
        filenames: &["chart.yaml", "kustomization.yaml"],
        path_fragments: &["k8s/", "kubernetes/", "helm/"],
    },
    TechRule {
        name: "Terraform",
        tech_type: TechType::Infrastructure,
        tier: Tier::None,
        dependencies: &[],
        extensions: &["tf"],
        filenames: &[],
        path_fragments: &[],
    },
    TechRule {
        name: "AWS",
        tech_type: TechType::Infrastructure,
        tier: Tier::None,
        dependencies: &["aws-sdk", "boto3", "@aws-sdk/client-s3", "aws-cdk-lib"],
        extensions: &[],
        filenames: &["cdk.json"],
        path_fragments: &[],
    },
    TechRule {
        name: "Kafka",
        tech_type: TechType::Infrastructure,
        tier: Tier::None,
        dependencies: &["kafkajs", "kafka-python", "confluent-kafka", "rdkafka"],
        extensions: &[],
        filenames: &[],
        path_fragments: &[],
    },
    TechRule {
        name: "RabbitMQ",
        tech_type: TechType::Infrastructure,
        tier: Tier::None,
        dependencies: &["amqplib", "pika", "lapin"],
        extensions: &[],
        filenames: &[],
        path_fragments: &[],
    },
    TechRule {
        name: "GitHub Actions",
        tech_type: TechType::Infrastructure,
        tier: Tier::None,
        dependencies: &[],
        extensions: &[],
        filenames: &[],
        path_fragments: &[".github/workflows/"],
    },
    // ===== Testing =====
    TechRule {
        name: "Jest",
        tech_type: TechType::Testing,
        tier: Tier::None,
        dependencies: &["jest", "ts-jest"],
        extensions: &[],
        filenames: &["jest.config.js", "jest.config.ts"],
        path_fragments: &[],
    },
    TechRule {
        name: "Mocha",
        tech_type: TechType::Testing,
        tier: Tier::None,
        dependencies: &["mocha"],
        extensions: &[],
        filenames: &[".mocharc.json", ".mocharc.yml"],
        path_fragments: &[],
    },
    TechRule {
        name: "Vitest",
        tech_type: TechType::Testing,
        tier: Tier::None,
        dependencies: &["vitest"],
        extensions: &[],
        filenames: &["vitest.config.ts", "vitest.config.js"],
        path_fragments: &[],
    },
    TechRule {
        name: "Pytest",
        tech_type: TechType::Testing,
        tier: Tier::None,
        dependencies: &["pytest"],
        extensions: &[],
        filenames: &["pytest.ini", "conftest.py"],
        path_fragments: &[],
    },
    TechRule {
        name: "Cypress",
        tech_type: TechType::Testing,
        tier: Tier::None,
        dependencies: &["cypress"],
        extensions: &[],
        filenames: &["cypress.config.js", "cypress.config.ts"],
        path_fragments: &[],
    },
    TechRule {
        name: "Playwright",
        tech_type: TechType::Testing,
        tier: Tier::None,
        dependencies: &["playwright", "@playwright/test"],
        extensions: &[],
        filenames: &["playwright.config.ts", "playwright.config.js"],
        path_fragments: &[],
    },
    // ===== Tooling =====
    TechRule {
        name: "ESLint",
        tech_type: TechType::Tooling,
        tier: Tier::None,
        dependencies: &["eslint"],
        extensions: &[],
        filenames: &[".eslintrc", ".eslintrc.js", ".eslintrc.json", "eslint.config.js"],
        path_fragments: &[],
    },
    TechRule {
        name: "Webpack",
        tech_type: TechType::Tooling,
        tier: Tier::None,
        dependencies: &["webpack"],
        extensions: &[],
        filenames: &["webpack.config.js"],
        path_fragments: &[],
    },
    TechRule {
        name: "Vite",
        tech_type: TechType::Tooling,
        tier: Tier::None,
        dependencies: &["vite"],
        extensions: &[],
        filenames: &["vite.config.js", "vite.config.ts"],
        path_fragments: &[],
    },
];

/// Capability rule definition
pub(crate) struct CapabilityRule {
    pub name: &'static str,
    pub dependencies: &'static [&'static str],
    pub path_fragments: &'static [&'static str],
}

pub(crate) const AUTHENTICATION: &str = "Authentication";

pub(crate) const CAPABILITY_RULES: &[CapabilityRule] = &[
    CapabilityRule {
        name: AUTHENTICATION,
        dependencies: &[
            "passport",
            "jsonwebtoken",
            "next-auth",
            "bcrypt",
            "bcryptjs",
            "pyjwt",
            "authlib",
            "django-allauth",
            "flask-login",
            "devise",
            "jsonwebtoken-rs",
            "oauth2",
        ],
        path_fragments: &["auth", "login", "oauth", "jwt", "session"],
    },
    CapabilityRule {
        name: "API Routing",
        dependencies: &[
            "express",
            "fastify",
            "koa",
            "@nestjs/core",
            "fastapi",
            "flask",
            "django",
            "axum",
            "actix-web",
        ],
        path_fragments: &["routes/", "controllers/", "/api/", "handlers/", "endpoints/"],
    },
    CapabilityRule {
        name: "Data Persistence",
        dependencies: &[
            "pg",
            "mysql2",
            "mongoose",
            "mongodb",
            "sequelize",
            "typeorm",
            "prisma",
            "@prisma/client",
            "sqlalchemy",
            "psycopg2",
            "knex",
            "diesel",
            "sqlx",
        ],
        path_fragments: &["models/", "migrations/", "repositories/", "entities/"],
    },
    CapabilityRule {
        name: "Vector Search",
        dependencies: &[
            "qdrant-client",
            "qdrant_client",
            "@qdrant/js-client-rest",
            "pinecone-client",
            "@pinecone-database/pinecone",
            "weaviate-client",
            "chromadb",
            "faiss-cpu",
            "pgvector",
            "pymilvus",
        ],
        path_fragments: &["vector", "embedding"],
    },
    CapabilityRule {
        name: "Caching",
        dependencies: &["redis", "ioredis", "memcached", "node-cache", "lru-cache"],
        path_fragments: &["cache"],
    },
    CapabilityRule {
        name: "Messaging",
        dependencies: &["kafkajs", "kafka-python", "confluent-kafka", "amqplib", "pika", "nats"],
        path_fragments: &["queue", "consumers/", "producers/"],
    },
    CapabilityRule {
        name: "Background Jobs",
        dependencies: &["bull", "bullmq", "celery", "agenda", "sidekiq", "rq"],
        path_fragments: &["workers/", "jobs/", "tasks/"],
    },
    CapabilityRule {
        name: "File Storage",
        dependencies: &["multer", "aws-sdk", "@aws-sdk/client-s3", "boto3", "minio"],
        path_fragments: &["uploads/", "storage/"],
    },
    CapabilityRule {
        name: "Payments",
        dependencies: &["stripe", "braintree", "@paypal/checkout-server-sdk", "paypalrestsdk"],
        path_fragments: &["payment", "billing", "checkout"],
    },
    CapabilityRule {
        name: "Notifications",
        dependencies: &["nodemailer", "twilio", "@sendgrid/mail", "sendgrid", "firebase-admin"],
        path_fragments: &["notification", "mailer", "email"],
    },
    CapabilityRule {
        name: "Search",
        dependencies: &["elasticsearch", "@elastic/elasticsearch", "algoliasearch", "meilisearch"],
        path_fragments: &["search"],
    },
    CapabilityRule {
        name: "LLM Integration",
        dependencies: &["openai", "anthropic", "@anthropic-ai/sdk", "langchain", "llama-index"],
        path_fragments: &["llm", "prompts/"],
    },
    CapabilityRule {
        name: "Real-time Communication",
        dependencies: &["socket.io", "ws", "pusher", "channels"],
        path_fragments: &["socket", "websocket"],
    },
];

// =============================================================================
// Dependency Categories
// =============================================================================

/// Name tokens per dependency category, checked in the order below.
/// Tokens of four or more characters also match as substrings.
pub(crate) const TESTING_DEPENDENCIES: &[&str] = &[
    "jest",
    "mocha",
    "chai",
    "sinon",
    "pytest",
    "vitest",
    "cypress",
    "playwright",
    "supertest",
    "testing-library",
    "nock",
    "rspec",
    "coverage",
    "mock",
    "proptest",
];

pub(crate) const DATA_DEPENDENCIES: &[&str] = &[
    "pg",
    "mysql",
    "mongo",
    "redis",
    "sequelize",
    "prisma",
    "typeorm",
    "knex",
    "sqlalchemy",
    "psycopg",
    "sqlite",
    "qdrant",
    "pinecone",
    "weaviate",
    "chroma",
    "elastic",
    "diesel",
    "sqlx",
    "gorm",
    "pandas",
    "alembic",
];

pub(crate) const API_DEPENDENCIES: &[&str] = &[
    "express",
    "fastify",
    "koa",
    "hapi",
    "axios",
    "graphql",
    "apollo",
    "fastapi",
    "flask",
    "django",
    "requests",
    "httpx",
    "grpc",
    "trpc",
    "node-fetch",
    "actix",
    "axum",
    "@nestjs",
    "cors",
    "body-parser",
];

pub(crate) const UI_DEPENDENCIES: &[&str] = &[
    "react",
    "vue",
    "angular",
    "svelte",
    "next",
    "nuxt",
    "tailwind",
    "bootstrap",
    "styled-components",
    "@mui",
    "@emotion",
    "jquery",
    "redux",
];

pub(crate) const UTILITY_DEPENDENCIES: &[&str] = &[
    "lodash",
    "moment",
    "dayjs",
    "date-fns",
    "uuid",
    "dotenv",
    "chalk",
    "commander",
    "yargs",
    "winston",
    "pino",
    "debug",
    "underscore",
    "ramda",
    "rxjs",
    "zod",
    "joi",
    "yup",
    "serde",
    "clap",
    "anyhow",
];

// =============================================================================
// Quality Signals
// =============================================================================

/// Logging and metrics dependencies that count as monitoring
pub(crate) const MONITORING_DEPENDENCIES: &[&str] = &[
    "winston",
    "pino",
    "morgan",
    "bunyan",
    "prom-client",
    "prometheus-client",
    "prometheus_client",
    "@sentry/node",
    "@sentry/react",
    "sentry-sdk",
    "dd-trace",
    "datadog",
    "newrelic",
    "@opentelemetry/api",
    "opentelemetry-api",
    "structlog",
    "loguru",
    "tracing",
    "prometheus",
    "go.uber.org/zap",
    "github.com/sirupsen/logrus",
];

/// Files that count as monitoring configuration
pub(crate) const MONITORING_FILES: &[&str] = &["prometheus.yml", "grafana", "datadog.yaml", "otel"];

/// Security-related dependencies
pub(crate) const SECURITY_DEPENDENCIES: &[&str] = &[
    "passport",
    "jsonwebtoken",
    "bcrypt",
    "bcryptjs",
    "argon2",
    "helmet",
    "next-auth",
    "pyjwt",
    "authlib",
    "keycloak-connect",
    "csurf",
    "django-allauth",
    "cryptography",
];

/// Path fragments marking security-related files
pub(crate) const SECURITY_PATH_FRAGMENTS: &[&str] =
    &["auth", "security", "jwt", "oauth", "permission", "login", "rbac"];

/// Path fragments marking CI configuration
pub(crate) const CI_PATH_FRAGMENTS: &[&str] = &[
    ".github/workflows/",
    ".gitlab-ci.yml",
    "jenkinsfile",
    ".circleci/",
    "azure-pipelines.yml",
    ".travis.yml",
    "bitbucket-pipelines.yml",
];

/// Path fragments marking test files
pub(crate) const TEST_PATH_FRAGMENTS: &[&str] = &[
    "/test/",
    "/tests/",
    "__tests__",
    "/spec/",
    ".test.",
    ".spec.",
    "_test.",
    "/test_",
    "e2e/",
];

/// Extensions counted as source code for the test ratio
pub(crate) const SOURCE_EXTENSIONS: &[&str] = &[
    "js", "jsx", "mjs", "cjs", "ts", "tsx", "py", "rs", "go", "java", "kt", "rb", "cs", "php",
    "vue", "svelte", "swift", "scala",
];

// =============================================================================
// Architecture Signals
// =============================================================================

pub(crate) const CONTAINER_FILES: &[&str] = &[
    "dockerfile",
    "docker-compose.yml",
    "docker-compose.yaml",
    "compose.yaml",
    "containerfile",
];

pub(crate) const MONOREPO_FILES: &[&str] =
    &["lerna.json", "pnpm-workspace.yaml", "nx.json", "turbo.json", "rush.json"];

pub(crate) const PACKAGE_MANIFESTS: &[&str] =
    &["package.json", "cargo.toml", "pyproject.toml", "go.mod", "setup.py"];

pub(crate) const SERVERLESS_FILES: &[&str] = &[
    "serverless.yml",
    "serverless.yaml",
    "netlify.toml",
    "vercel.json",
    "template.yaml",
];

pub(crate) const BROKER_DEPENDENCIES: &[&str] = &[
    "kafkajs",
    "kafka-python",
    "confluent-kafka",
    "rdkafka",
    "amqplib",
    "pika",
    "lapin",
    "bull",
    "bullmq",
    "celery",
    "nats",
    "@aws-sdk/client-sqs",
];

/// Directories whose files name data entities
pub(crate) const ENTITY_DIRECTORIES: &[&str] =
    &["models", "model", "entities", "entity", "schemas", "schema"];

/// Basenames that are never entities
pub(crate) const ENTITY_EXCLUDES: &[&str] = &["index", "__init__", "mod", "base", "types", "utils"];

/// Route-registration regexes applied to sampled file contents
pub(crate) const ROUTE_PATTERNS: &[&str] = &[
    r"(?i)\b(?:app|router|route|server|api|bp|blueprint)\.(?:get|post|put|patch|delete|all)\s*\(",
    r"@(?:app|router|api|bp|blueprint)\.(?:get|post|put|patch|delete|route)\s*\(",
    r"@(?:Get|Post|Put|Patch|Delete|Request)Mapping\b",
    r"@(?:Get|Post|Put|Patch|Delete)\s*\(",
];

/// Match a lowercased dependency name against a category token
pub(crate) fn dependency_matches(name: &str, token: &str) -> bool {
    name == token || (token.len() >= 4 && name.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_tokens_match_exactly() {
        assert!(dependency_matches("pg", "pg"));
        assert!(!dependency_matches("upgrade-kit", "pg"));
        assert!(dependency_matches("@prisma/client", "prisma"));
    }

    #[test]
    fn test_registry_names_are_unique() {
        let mut names: Vec<_> = TECH_RULES.iter().map(|r| r.name).collect();
        names.sort();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }
}
