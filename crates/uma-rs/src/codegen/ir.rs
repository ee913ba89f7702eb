//! Structured form of the emitted C. Lowering produces these values; only
//! `render` turns them into text.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CType {
    Void,
    VoidPtr,
    Int8Ptr,
    Int32,
    Int32Ptr,
    SizeT,
}

impl CType {
    pub fn c_name(self) -> &'static str {
        match self {
            CType::Void => "void",
            CType::VoidPtr => "void*",
            CType::Int8Ptr => "int8_t*",
            CType::Int32 => "int32_t",
            CType::Int32Ptr => "int32_t*",
            CType::SizeT => "size_t",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: CType,
    pub name: String,
}

impl Param {
    pub fn new(ty: CType, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(String),
    Int(i64),
    Cast { ty: CType, value: Box<Expr> },
    Call { callee: String, args: Vec<Expr> },
    NotEqual(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn call(callee: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: callee.into(),
            args,
        }
    }

    pub fn cast(ty: CType, value: Expr) -> Self {
        Expr::Cast {
            ty,
            value: Box::new(value),
        }
    }

    pub fn not_equal(lhs: Expr, rhs: Expr) -> Self {
        Expr::NotEqual(Box::new(lhs), Box::new(rhs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Let {
        constant: bool,
        ty: CType,
        name: String,
        init: Expr,
    },
    Expr(Expr),
    ReturnIf { cond: Expr, value: Expr },
    Return(Expr),
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Comment(String),
    Include(String),
    StaticArray {
        section: Option<String>,
        elem: CType,
        name: String,
        values: Vec<i32>,
    },
    /// Items wrapped in the `#ifdef __cplusplus` / `extern "C"` guard.
    ExternC(Vec<Item>),
    Prototype {
        ret: CType,
        name: String,
        params: Vec<Param>,
    },
    Function {
        ret: CType,
        name: String,
        params: Vec<Param>,
        body: Vec<Stmt>,
    },
    Blank,
}
