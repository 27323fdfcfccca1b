//! Grammar block extraction
//!
//! Host source is copied through unchanged except for grammar blocks:
//!
//! ```text
//! /*!* TargetName
//! Rule: expression
//! */
//! ```
//!
//! A block without a name continues the previous target. A name starting
//! with `!` is a pragma instead of a target. Compilation is two-pass: every
//! block is parsed before any is rendered, so a rule may call rules declared
//! in later blocks of the same target.

use super::error::{CompileError, CompileWarning, WarningKind};
use super::ruleset::RuleSet;
use crate::runtime::regex_cache;
use std::io::{Read, Write};

const MARKER: &[u8] = b"/*!*";

const BLOCK_RX: &str = r"(?m)^([ \t]*)/\*!\*(?:[ \t]*(!?\w*))?((?:[^*]|\*[^/])*)\*/";

const DEFAULT_TARGET: &str = "AnonymousParser";

const AUTOGEN_WARNING: &str = "// WARNING: This file has been machine generated. Do not edit it, or your changes will be overwritten next time it is compiled.";

/// Compiler settings
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// Path the generated code uses to reach the runtime
    pub runtime_path: String,
    /// Emit rule-call tracing for every rule, as if the source began with
    /// a `!debug` pragma
    pub debug: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            runtime_path: "::pegc::runtime".to_string(),
            debug: false,
        }
    }
}

impl CompilerOptions {
    /// Set the runtime path
    pub fn with_runtime_path(mut self, path: &str) -> Self {
        self.runtime_path = path.to_string();
        self
    }

    /// Enable tracing from the start
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Result of a successful compile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    /// Host source with every grammar block replaced by generated code
    pub code: String,
    /// Non-fatal diagnostics
    pub warnings: Vec<CompileWarning>,
}

/// State threaded through one compile
#[derive(Debug)]
struct CompilerContext {
    target: String,
    debug: bool,
    rulesets: Vec<RuleSet>,
    warnings: Vec<CompileWarning>,
}

impl CompilerContext {
    fn new(debug: bool) -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            debug,
            rulesets: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Index of the current target's rule set, created on first use
    fn current_ruleset(&mut self) -> usize {
        match self.rulesets.iter().position(|rs| rs.target() == self.target) {
            Some(index) => index,
            None => {
                self.rulesets.push(RuleSet::new(&self.target));
                self.rulesets.len() - 1
            }
        }
    }
}

/// A span of the output
#[derive(Debug)]
enum Piece<'s> {
    Host(&'s str),
    AutogenWarning { indent: &'s str },
    Block {
        ruleset: usize,
        indent: &'s str,
        ids: Vec<usize>,
    },
}

/// Grammar compiler
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    /// Compiler with the given options
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    /// Options in use
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Replace every grammar block in `source` with generated Rust
    pub fn compile(&self, source: &str) -> Result<CompileOutput, CompileError> {
        if memchr::memmem::find(source.as_bytes(), MARKER).is_none() {
            return Ok(CompileOutput {
                code: source.to_string(),
                warnings: Vec::new(),
            });
        }

        let block_rx = regex_cache::get_or_compile(BLOCK_RX).map_err(|_| {
            CompileError::MalformedRule {
                spec: BLOCK_RX.to_string(),
            }
        })?;

        let mut ctx = CompilerContext::new(self.options.debug);
        let mut pieces = Vec::new();
        let mut last = 0;

        for caps in block_rx.captures_iter(source) {
            let (Some(whole), Some(indent)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            pieces.push(Piece::Host(&source[last..whole.start()]));
            last = whole.end();

            let indent = indent.as_str();
            let name = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            let text = caps.get(3).map(|m| m.as_str()).unwrap_or("");

            if let Some(pragma) = name.strip_prefix('!') {
                match pragma {
                    "silent" => {}
                    "insert_autogen_warning" => pieces.push(Piece::AutogenWarning { indent }),
                    "debug" => ctx.debug = true,
                    _ => {
                        return Err(CompileError::UnknownPragma {
                            name: name.to_string(),
                        })
                    }
                }
                continue;
            }

            if !name.is_empty() {
                ctx.target = name.to_string();
            }
            let ruleset = ctx.current_ruleset();
            let debug = ctx.debug;
            let ids = ctx.rulesets[ruleset].parse_block(indent, text, debug, &mut ctx.warnings)?;
            if ids.is_empty() {
                let warning = CompileWarning::new(
                    WarningKind::EmptyBlock,
                    &ctx.target,
                    "grammar block defines no rules",
                );
                log_warn!("{}", warning);
                ctx.warnings.push(warning);
            }
            pieces.push(Piece::Block {
                ruleset,
                indent,
                ids,
            });
        }
        pieces.push(Piece::Host(&source[last..]));

        for ruleset in &ctx.rulesets {
            ruleset.validate()?;
            ruleset.analyze(&mut ctx.warnings);
        }

        // The epilogue of each target follows its last block
        let mut last_block = vec![None; ctx.rulesets.len()];
        for (i, piece) in pieces.iter().enumerate() {
            if let Piece::Block { ruleset, .. } = piece {
                last_block[*ruleset] = Some(i);
            }
        }

        let runtime = self.options.runtime_path.as_str();
        let mut code = String::with_capacity(source.len() * 2);
        for (i, piece) in pieces.iter().enumerate() {
            match piece {
                Piece::Host(text) => code.push_str(text),
                Piece::AutogenWarning { indent } => {
                    code.push_str(indent);
                    code.push_str(AUTOGEN_WARNING);
                }
                Piece::Block {
                    ruleset,
                    indent,
                    ids,
                } => {
                    let rs = &ctx.rulesets[*ruleset];
                    let mut block = rs.render_rules(ids, runtime);
                    if last_block[*ruleset] == Some(i) {
                        if !block.is_empty() {
                            block = block.line("");
                        }
                        block = block.append(rs.render_epilogue(runtime));
                    }
                    let rendered = block.render(indent);
                    code.push_str(rendered.trim_end_matches('\n'));
                }
            }
        }

        log_debug!(
            "compiled {} target(s), {} warning(s)",
            ctx.rulesets.len(),
            ctx.warnings.len()
        );
        Ok(CompileOutput {
            code,
            warnings: ctx.warnings,
        })
    }
}

/// Compile `source` with default options
pub fn compile(source: &str) -> Result<CompileOutput, CompileError> {
    Compiler::default().compile(source)
}

/// Compile the file at `input` and write the result to `output`
///
/// # Arguments
///
/// * `input` - Path of the host source, or `-` for stdin
/// * `output` - Path to write, or `None` / `Some("-")` for stdout
///
/// # Returns
///
/// The non-fatal warnings, or the first fatal error. Unreadable input and
/// unwritable output are reported as [`CompileError::Io`].
///
/// # Example
///
/// ```no_run
/// let warnings = pegc::compile_file("src/parser.grammar.rs", Some("src/parser.rs"))?;
/// for warning in &warnings {
///     eprintln!("{}", warning);
/// }
/// # Ok::<(), pegc::CompileError>(())
/// ```
pub fn compile_file(
    input: &str,
    output: Option<&str>,
) -> Result<Vec<CompileWarning>, CompileError> {
    compile_file_with(&Compiler::default(), input, output)
}

/// [`compile_file`] with an explicit compiler
pub fn compile_file_with(
    compiler: &Compiler,
    input: &str,
    output: Option<&str>,
) -> Result<Vec<CompileWarning>, CompileError> {
    let io_error = |path: &str, e: std::io::Error| CompileError::Io {
        path: path.to_string(),
        message: e.to_string(),
    };

    let source = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| io_error(input, e))?;
        buf
    } else {
        std::fs::read_to_string(input).map_err(|e| io_error(input, e))?
    };

    let out = compiler.compile(&source)?;

    match output {
        None | Some("-") => std::io::stdout()
            .write_all(out.code.as_bytes())
            .map_err(|e| io_error("-", e))?,
        Some(path) => std::fs::write(path, &out.code).map_err(|e| io_error(path, e))?,
    }
    Ok(out.warnings)
}
