use super::ir::{Expr, Item, Param, Stmt};

const INDENT: &str = "  ";

/// Output buffer plus the current nesting depth. Each render call owns its
/// own printer, so no formatting state survives between calls.
#[derive(Debug, Default)]
pub struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: &str) {
        if line.is_empty() {
            self.out.push('\n');
            return;
        }
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
        self.out.push_str(line);
        self.out.push('\n');
    }

    pub fn indented<F>(&mut self, body: F)
    where
        F: FnOnce(&mut Printer),
    {
        self.indent += 1;
        body(self);
        self.indent -= 1;
    }

    pub fn finish(self) -> String {
        self.out
    }
}

pub fn render_items(items: &[Item]) -> String {
    let mut printer = Printer::new();
    for item in items {
        render_item(&mut printer, item);
    }
    printer.finish()
}

fn render_item(printer: &mut Printer, item: &Item) {
    match item {
        Item::Comment(text) => printer.push_line(&format!("// {text}")),
        Item::Include(header) => {
            let header = if header.starts_with('<') || header.starts_with('"') {
                header.clone()
            } else {
                format!("<{header}>")
            };
            printer.push_line(&format!("#include {header}"));
        }
        Item::StaticArray {
            section,
            elem,
            name,
            values,
        } => {
            let attr = section
                .as_ref()
                .map(|section| format!("__attribute__((section(\"{section}\"))) "))
                .unwrap_or_default();
            let elem = elem.c_name();
            let len = values.len();
            let init = values
                .iter()
                .map(|value| value.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            printer.push_line(&format!(
                "{attr}static {elem} {name}[{len}] = {{{init}}};"
            ));
        }
        Item::ExternC(items) => {
            printer.push_line("#ifdef __cplusplus");
            printer.push_line("extern \"C\" {");
            printer.push_line("#endif");
            for item in items {
                render_item(printer, item);
            }
            printer.push_line("#ifdef __cplusplus");
            printer.push_line("}");
            printer.push_line("#endif");
        }
        Item::Prototype { ret, name, params } => {
            let ret = ret.c_name();
            let params = render_params(params);
            printer.push_line(&format!("{ret} {name}({params});"));
        }
        Item::Function {
            ret,
            name,
            params,
            body,
        } => {
            let ret = ret.c_name();
            let params = render_params(params);
            printer.push_line(&format!("{ret} {name}({params}) {{"));
            printer.indented(|printer| {
                for stmt in body {
                    render_stmt(printer, stmt);
                }
            });
            printer.push_line("}");
        }
        Item::Blank => printer.push_line(""),
    }
}

fn render_params(params: &[Param]) -> String {
    if params.is_empty() {
        return "void".to_string();
    }
    params
        .iter()
        .map(|param| format!("{} {}", param.ty.c_name(), param.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_stmt(printer: &mut Printer, stmt: &Stmt) {
    match stmt {
        Stmt::Let {
            constant,
            ty,
            name,
            init,
        } => {
            let qualifier = if *constant { "const " } else { "" };
            let ty = ty.c_name();
            let init = render_expr(init);
            printer.push_line(&format!("{qualifier}{ty} {name} = {init};"));
        }
        Stmt::Expr(expr) => printer.push_line(&format!("{};", render_expr(expr))),
        Stmt::ReturnIf { cond, value } => {
            let cond = render_expr(cond);
            let value = render_expr(value);
            printer.push_line(&format!("if ({cond}) {{ return {value}; }}"));
        }
        Stmt::Return(value) => printer.push_line(&format!("return {};", render_expr(value))),
        Stmt::Blank => printer.push_line(""),
    }
}

fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Ident(name) => name.clone(),
        Expr::Int(value) => value.to_string(),
        Expr::Cast { ty, value } => format!("({})({})", ty.c_name(), render_expr(value)),
        Expr::Call { callee, args } => {
            let args = args.iter().map(render_expr).collect::<Vec<_>>().join(", ");
            format!("{callee}({args})")
        }
        Expr::NotEqual(lhs, rhs) => format!("{} != {}", render_expr(lhs), render_expr(rhs)),
    }
}
