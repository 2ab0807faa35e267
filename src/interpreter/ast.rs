use std::fmt::{Display, Formatter};
use std::rc::Rc;
use crate::interpreter::lexer::Token;
use crate::util;

/// Common capability of every syntax tree node. The `Display` impl is the canonical
/// re-serialization; infix and prefix expressions are rendered fully parenthesized.
pub trait Node: Display {
    fn token_literal(&self) -> &str;
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Node for Program {
    fn token_literal(&self) -> &str {
        self.statements.first().map(Stmt::token_literal).unwrap_or("")
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.statements.iter().try_for_each(|stmt| write!(f, "{}", stmt))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Stmt>,
}

impl Node for BlockStatement {
    fn token_literal(&self) -> &str {
        self.token.source()
    }
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.statements.iter().try_for_each(|stmt| write!(f, "{}", stmt))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Let {
        token: Token,
        name: Token,
        value: Expr,
    },
    Return {
        token: Token,
        value: Expr,
    },
    Expression {
        token: Token,
        expr: Expr,
    },
}

impl Node for Stmt {
    fn token_literal(&self) -> &str {
        match self {
            Stmt::Let { token, .. } | Stmt::Return { token, .. } | Stmt::Expression { token, .. } => token.source(),
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Let { token, name, value } => write!(f, "{} {} = {};", token.source(), name.source(), value),
            Stmt::Return { token, value } => write!(f, "{} {}", token.source(), value),
            Stmt::Expression { expr, .. } => write!(f, "{}", expr),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Identifier(Token),
    IntegerLiteral {
        token: Token,
        value: i64,
    },
    BooleanLiteral {
        token: Token,
        value: bool,
    },
    NullLiteral(Token),
    StringLiteral(Token),

    Prefix {
        operator: Token,
        right: Box<Expr>,
    },
    Infix {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Ternary {
        token: Token,
        condition: Box<Expr>,
        consequence: Box<Expr>,
        alternative: Box<Expr>,
    },
    If {
        token: Token,
        condition: Box<Expr>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    FunctionLiteral {
        token: Token,
        // Shared with every function value created from this literal
        parameters: Rc<[Token]>,
        body: Rc<BlockStatement>,
    },
    Call {
        token: Token,
        function: Box<Expr>,
        arguments: Vec<Expr>,
    },
    ArrayLiteral {
        token: Token,
        elements: Vec<Expr>,
    },
    Index {
        token: Token,
        left: Box<Expr>,
        index: Box<Expr>,
    },
    HashLiteral {
        token: Token,
        pairs: Vec<(Expr, Expr)>,
    },
}

impl Node for Expr {
    fn token_literal(&self) -> &str {
        match self {
            Expr::Identifier(token) | Expr::NullLiteral(token) | Expr::StringLiteral(token) => token.source(),
            Expr::IntegerLiteral { token, .. } | Expr::BooleanLiteral { token, .. } => token.source(),
            Expr::Prefix { operator, .. } | Expr::Infix { operator, .. } => operator.source(),
            Expr::Ternary { token, .. }
            | Expr::If { token, .. }
            | Expr::FunctionLiteral { token, .. }
            | Expr::Call { token, .. }
            | Expr::ArrayLiteral { token, .. }
            | Expr::Index { token, .. }
            | Expr::HashLiteral { token, .. } => token.source(),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Identifier(token) => write!(f, "{}", token.source()),
            Expr::IntegerLiteral { token, .. } => write!(f, "{}", token.source()),
            Expr::BooleanLiteral { token, .. } => write!(f, "{}", token.source()),
            Expr::NullLiteral(token) => write!(f, "{}", token.source()),
            Expr::StringLiteral(token) => write!(f, "{}", token.source()),
            Expr::Prefix { operator, right } => write!(f, "({}{})", operator.source(), right),
            Expr::Infix { left, operator, right } => write!(f, "({} {} {})", left, operator.source(), right),
            Expr::Ternary { condition, consequence, alternative, .. } =>
                write!(f, "({} ? {} : {})", condition, consequence, alternative),
            Expr::If { condition, consequence, alternative, .. } => {
                write!(f, "if {} {}", condition, consequence)?;

                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }

                Ok(())
            },
            Expr::FunctionLiteral { token, parameters, body } =>
                write!(f, "{}({}) {}", token.source(), parameters.iter()
                    .map(|param| param.source()).collect::<Vec<&str>>().join(", "), body),
            Expr::Call { function, arguments, .. } => write!(f, "{}({})", function, util::join(arguments, ", ")),
            Expr::ArrayLiteral { elements, .. } => write!(f, "[{}]", util::join(elements, ", ")),
            Expr::Index { left, index, .. } => write!(f, "({}[{}])", left, index),
            Expr::HashLiteral { pairs, .. } => write!(f, "{{{}}}", pairs.iter()
                .map(|(key, value)| format!("{}:{}", key, value)).collect::<Vec<String>>()
                .join(", ")),
        }
    }
}
