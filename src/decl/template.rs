//! Template parameter lists, shared by classes, functions, and aliases
//! (spec.md §3 "Template declaration (mix-in on Class/Function/Type alias)").

use crate::ids::{DeclId, ExprId};

/// One type parameter in a declaration's template parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateParam {
    pub name: String,
    pub variadic: bool,
    pub default: Option<ExprId>,
}

impl TemplateParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variadic: false,
            default: None,
        }
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn with_default(mut self, default: ExprId) -> Self {
        self.default = Some(default);
        self
    }
}

/// Template mix-in, attached to `ClassDecl`, `FunctionDecl`, and
/// `AliasDecl`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateInfo {
    pub params: Vec<TemplateParam>,
    /// The paired non-generic variant, if this template is one of two
    /// overloads where one has a basic (non-template) version.
    pub basic_version: Option<DeclId>,
}

impl TemplateInfo {
    pub fn new(params: Vec<TemplateParam>) -> Self {
        Self {
            params,
            basic_version: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
