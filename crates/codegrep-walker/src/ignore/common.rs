//! Built-in ignore sets for common ecosystems, keyed by short tag.

const GO: &[&str] = &[
    "*.exe",
    "*.exe~",
    "*.dll",
    "*.so",
    "*.dylib",
    "*.test",
    "*.out",
    "coverage.*",
    "*.coverprofile",
    "profile.cov",
    "vendor/",
    "go.work",
    "go.work.sum",
];

const NODE: &[&str] = &[
    "node_modules/",
    "npm-debug.log*",
    "yarn-debug.log*",
    "yarn-error.log*",
    ".npm",
    ".eslintcache",
    ".nyc_output",
    "coverage/",
    ".coverage",
    "*.tgz",
    "*.tar.gz",
    ".cache/",
];

const PYTHON: &[&str] = &[
    "__pycache__/",
    "*.py[cod]",
    "*$py.class",
    "*.so",
    ".Python",
    "build/",
    "develop-eggs/",
    "dist/",
    "downloads/",
    "eggs/",
    ".eggs/",
    "lib/",
    "lib64/",
    "parts/",
    "sdist/",
    "var/",
    "wheels/",
    "pip-wheel-metadata/",
    "share/python-wheels/",
    "*.egg-info/",
    ".installed.cfg",
    "*.egg",
    "MANIFEST",
    ".env",
    ".venv",
    "env/",
    "venv/",
    "ENV/",
    "env.bak/",
    "venv.bak/",
];

const JAVA: &[&str] = &[
    "*.class",
    "*.log",
    "*.ctxt",
    ".mtj.tmp/",
    "*.jar",
    "*.war",
    "*.nar",
    "*.ear",
    "*.zip",
    "*.tar.gz",
    "*.rar",
    "hs_err_pid*",
    "target/",
    ".mvn/",
    "mvnw",
    "mvnw.cmd",
    ".gradle/",
    "build/",
    "gradle-app.setting",
    "!gradle-wrapper.jar",
    ".gradletasknamecache",
];

const RUST: &[&str] = &["target/", "**/*.rs.bk", "*.pdb", "Cargo.lock"];

const COMMON: &[&str] = &[
    ".DS_Store",
    "Thumbs.db",
    "*.tmp",
    "*.temp",
    "*.log",
    ".idea/",
    ".vscode/",
    "*.swp",
    "*.swo",
    "*~",
    ".env",
    ".env.local",
    ".env.*.local",
];

static TABLE: &[(&str, &[&str])] = &[
    ("go", GO),
    ("node", NODE),
    ("python", PYTHON),
    ("java", JAVA),
    ("rust", RUST),
    ("common", COMMON),
];

/// Patterns for `tag`, if it is a known ecosystem.
pub fn common_patterns(tag: &str) -> Option<&'static [&'static str]> {
    TABLE
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, patterns)| *patterns)
}

/// All known ecosystem tags.
pub fn common_ignore_tags() -> impl Iterator<Item = &'static str> {
    TABLE.iter().map(|(name, _)| *name)
}
