//! A simple text template engine.
//!
//! # Features
//!
//! - Variable interpolation: `{{ name }}`
//! - Conditionals: `{{ if a }} .. {{ elif b }} .. {{ else }} .. {{ endif }}`
//! - Loops: `{{ for item in items }} .. {{ endfor }}`
//! - Index access into maps: `{{ user['name'] }}`
//! - A small expression language with short-circuiting logical operators,
//!   comparisons, negation and null-coalescing:
//!   `&& || == != > < >= <= ! ??`
//! - Render using any [`serde`] serializable context, or build one with the
//!   [`value!`] / [`context!`] macros.
//!
//! # Introduction
//!
//! The pipeline has three composable stages: [`tokenize`] produces a flat
//! token stream, [`parse`] builds the template AST, and [`render`] walks the
//! tree against a context of named values. [`render_template`] runs all
//! three in one call.
//!
//! ```
//! let mut ctx = ginger::context! { name: "World" };
//! let result = ginger::render_template("Hello, {{ name }}!", &mut ctx)?;
//! assert_eq!(result, "Hello, World!");
//! # Ok::<(), ginger::Error>(())
//! ```
//!
//! A template can also be compiled once and rendered many times.
//!
//! ```
//! let template = ginger::Template::compile(
//!     "{{ if logged_in }}Welcome back!{{ else }}Please log in.{{ endif }}",
//! )?;
//! let result = template.render(&mut ginger::context! { logged_in: true })?;
//! assert_eq!(result, "Welcome back!");
//! # Ok::<(), ginger::Error>(())
//! ```
//!
//! # Expressions
//!
//! `&&` and `||` evaluate to one of their operands rather than a boolean, so
//! expressions like the following select a value.
//!
//! ```
//! let mut ctx = ginger::context! { verified: true, mfa: true };
//! let result = ginger::render_template(
//!     "{{ verified && mfa && 'Fully Verified' || 'Incomplete' }}",
//!     &mut ctx,
//! )?;
//! assert_eq!(result, "Fully Verified");
//! # Ok::<(), ginger::Error>(())
//! ```

mod ast;
mod error;
mod lex;
mod macros;
mod parse;
mod render;
pub mod value;

pub use crate::ast::{
    Cond, ElifBranch, Expr, ExprItem, ForLoop, IfElse, Node, Op, Operand, Scope, Template,
};
pub use crate::error::{Error, ParseError, RenderError};
pub use crate::lex::{tokenize, Lexer, Token, TokenKind};
pub use crate::parse::parse;
pub use crate::render::render;
#[cfg(feature = "serde")]
pub use crate::value::to_value;
pub use crate::value::{Context, List, Map, Value};

/// A type alias for results in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Tokenize, parse and render in one call.
pub fn render_template(source: &str, context: &mut Context) -> Result<String> {
    let template = parse(tokenize(source))?;
    Ok(render(&template, context)?)
}

impl Template {
    /// Compile template source into a reusable template.
    pub fn compile(source: &str) -> Result<Template, ParseError> {
        parse(tokenize(source))
    }

    /// Render this template using the provided context.
    pub fn render(&self, context: &mut Context) -> Result<String, RenderError> {
        render(self, context)
    }

    /// Render this template using any serializable context.
    ///
    /// The context must serialize to a map.
    ///
    /// ```
    /// #[derive(serde::Serialize)]
    /// struct Globals {
    ///     name: String,
    /// }
    ///
    /// let template = ginger::Template::compile("Hello, {{ name }}!")?;
    /// let result = template.render_from(Globals {
    ///     name: String::from("World"),
    /// })?;
    /// assert_eq!(result, "Hello, World!");
    /// # Ok::<(), ginger::Error>(())
    /// ```
    #[cfg(feature = "serde")]
    pub fn render_from<S>(&self, globals: S) -> Result<String>
    where
        S: serde::Serialize,
    {
        match to_value(globals)? {
            Value::Map(mut context) => Ok(render(self, &mut context)?),
            value => Err(Error::Serialize(format!(
                "context must be a map, got {}",
                value.human()
            ))),
        }
    }
}
