// RFC 6570 URI Templates (levels 1-4)
//
// A template is parsed once into an immutable `Template`, then expanded
// against variable bindings or matched against concrete URIs to recover them.

mod ast;
mod encoding;
mod error;
mod expander;
mod extractor;
mod operators;
mod parser;
mod value;

pub use ast::{Expression, Modifier, Part, Template, VarSpec};
pub use encoding::{decode, decode_form, encode_reserved, encode_strict, Encoding, QueryParameters};
pub use error::{ExpansionError, ExtractionError, ExtractionErrorKind, ParseError, ParseErrorKind};
pub use expander::{expand, expand_expression};
pub use extractor::{extract, ExtractOptions, Shape};
pub use operators::{Operator, OperatorDescriptor};
pub use parser::TemplateParser;
pub use value::{InvalidValue, Scalar, VariableValue, VariableValues};
