//! Language definitions and the built-in registry.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// A named file type: how to recognize it by extension, file name,
/// MIME type, or shebang interpreter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    /// Extensions with their leading dot, e.g. `.rs`.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// File names, literal or glob, e.g. `Makefile` or `Dockerfile.*`.
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub mime_types: Vec<String>,
    /// Substrings looked for in a `#!` line.
    #[serde(default)]
    pub shebangs: Vec<String>,
}

impl Language {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = to_strings(extensions);
        self
    }

    pub fn with_patterns(mut self, patterns: &[&str]) -> Self {
        self.patterns = to_strings(patterns);
        self
    }

    pub fn with_mime_types(mut self, mime_types: &[&str]) -> Self {
        self.mime_types = to_strings(mime_types);
        self
    }

    pub fn with_shebangs(mut self, shebangs: &[&str]) -> Self {
        self.shebangs = to_strings(shebangs);
        self
    }

    /// Registry key: the lowercased name.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

static DEFAULT_LANGUAGES: LazyLock<Vec<Language>> = LazyLock::new(|| {
    vec![
        Language::new("Go")
            .with_extensions(&[".go", ".mod", ".sum"])
            .with_patterns(&["go.mod", "go.sum", "go.work", "go.work.sum"])
            .with_mime_types(&["text/x-go"])
            .with_shebangs(&["go run"]),
        Language::new("JavaScript")
            .with_extensions(&[".js", ".mjs", ".jsx", ".es6", ".es"])
            .with_patterns(&[".eslintrc.js", ".babelrc.js"])
            .with_mime_types(&["application/javascript", "text/javascript"])
            .with_shebangs(&["node", "nodejs"]),
        Language::new("TypeScript")
            .with_extensions(&[".ts", ".tsx", ".d.ts"])
            .with_patterns(&["tsconfig.json", ".tslintrc"])
            .with_mime_types(&["application/typescript"]),
        Language::new("Python")
            .with_extensions(&[".py", ".pyw", ".pyi", ".pyx", ".pyd"])
            .with_patterns(&["Pipfile", "pyproject.toml", "setup.py", "requirements.txt"])
            .with_mime_types(&["text/x-python", "application/x-python"])
            .with_shebangs(&["python", "python2", "python3"]),
        Language::new("Java")
            .with_extensions(&[".java", ".class", ".jar", ".gradle"])
            .with_patterns(&["build.gradle", "pom.xml", "gradle.properties"])
            .with_mime_types(&["text/x-java-source"]),
        Language::new("C")
            .with_extensions(&[".c", ".h"])
            .with_mime_types(&["text/x-c", "text/x-csrc"]),
        Language::new("C++")
            .with_extensions(&[".cpp", ".cxx", ".cc", ".c++", ".hpp", ".hxx", ".hh", ".h++"])
            .with_mime_types(&["text/x-c++", "text/x-c++src"]),
        Language::new("Rust")
            .with_extensions(&[".rs", ".rlib"])
            .with_patterns(&["Cargo.toml", "Cargo.lock"])
            .with_mime_types(&["text/rust"]),
        Language::new("C#")
            .with_extensions(&[".cs", ".csx", ".csproj", ".sln"])
            .with_mime_types(&["text/x-csharp"]),
        Language::new("Ruby")
            .with_extensions(&[".rb", ".rbw", ".rake", ".gemspec"])
            .with_patterns(&["Rakefile", "Gemfile", "Gemfile.lock"])
            .with_mime_types(&["text/x-ruby"])
            .with_shebangs(&["ruby"]),
        Language::new("PHP")
            .with_extensions(&[".php", ".php3", ".php4", ".php5", ".phtml"])
            .with_mime_types(&["text/x-php", "application/x-php"])
            .with_shebangs(&["php"]),
        Language::new("Shell")
            .with_extensions(&[".sh", ".bash", ".zsh", ".fish", ".csh", ".tcsh", ".ksh"])
            .with_mime_types(&["text/x-shellscript", "application/x-sh"])
            .with_shebangs(&["sh", "bash", "zsh", "fish", "csh", "tcsh", "ksh"]),
        Language::new("HTML")
            .with_extensions(&[".html", ".htm", ".xhtml"])
            .with_mime_types(&["text/html", "application/xhtml+xml"]),
        Language::new("CSS")
            .with_extensions(&[".css", ".scss", ".sass", ".less"])
            .with_mime_types(&["text/css"]),
        Language::new("JSON")
            .with_extensions(&[".json", ".jsonc", ".json5"])
            .with_patterns(&[".eslintrc", ".babelrc", "tsconfig.json", "package.json"])
            .with_mime_types(&["application/json", "text/json"]),
        Language::new("YAML")
            .with_extensions(&[".yaml", ".yml"])
            .with_patterns(&[".github/workflows/*.yml", ".github/workflows/*.yaml"])
            .with_mime_types(&["text/yaml", "application/x-yaml"]),
        Language::new("XML")
            .with_extensions(&[".xml", ".xsl", ".xslt", ".xsd"])
            .with_patterns(&["pom.xml", "web.xml"])
            .with_mime_types(&["text/xml", "application/xml"]),
        Language::new("Markdown")
            .with_extensions(&[".md", ".markdown", ".mdown", ".mkd"])
            .with_patterns(&["README.md", "CHANGELOG.md"])
            .with_mime_types(&["text/markdown", "text/x-markdown"]),
        Language::new("SQL")
            .with_extensions(&[".sql"])
            .with_mime_types(&["text/x-sql"]),
        Language::new("Docker")
            .with_extensions(&[".dockerfile"])
            .with_patterns(&["Dockerfile", "Dockerfile.*", ".dockerignore"])
            .with_mime_types(&["text/x-dockerfile"]),
        Language::new("Makefile")
            .with_extensions(&[".mk", ".mak"])
            .with_patterns(&["Makefile", "makefile", "GNUmakefile", "*.mk"])
            .with_mime_types(&["text/x-makefile"]),
    ]
});

/// The built-in languages, in registration order.
pub fn default_languages() -> &'static [Language] {
    &DEFAULT_LANGUAGES
}

/// Extension → MIME type, for extensions with a well-known type.
static MIME_TYPES: &[(&str, &str)] = &[
    (".avif", "image/avif"),
    (".bmp", "image/bmp"),
    (".css", "text/css"),
    (".csv", "text/csv"),
    (".gif", "image/gif"),
    (".gz", "application/gzip"),
    (".htm", "text/html"),
    (".html", "text/html"),
    (".ico", "image/vnd.microsoft.icon"),
    (".jpeg", "image/jpeg"),
    (".jpg", "image/jpeg"),
    (".js", "text/javascript"),
    (".json", "application/json"),
    (".md", "text/markdown"),
    (".mjs", "text/javascript"),
    (".mp3", "audio/mpeg"),
    (".mp4", "video/mp4"),
    (".pdf", "application/pdf"),
    (".png", "image/png"),
    (".py", "text/x-python"),
    (".sh", "application/x-sh"),
    (".svg", "image/svg+xml"),
    (".tar", "application/x-tar"),
    (".txt", "text/plain"),
    (".wasm", "application/wasm"),
    (".webp", "image/webp"),
    (".xhtml", "application/xhtml+xml"),
    (".xml", "text/xml"),
    (".yaml", "application/yaml"),
    (".yml", "application/yaml"),
    (".zip", "application/zip"),
];

/// MIME type for a lowercased extension (leading dot included).
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    MIME_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Compare MIME types by essence, ignoring parameters and case.
pub fn mime_matches(a: &str, b: &str) -> bool {
    fn essence(mime: &str) -> &str {
        mime.split(';').next().unwrap_or(mime).trim()
    }
    essence(a).eq_ignore_ascii_case(essence(b))
}
