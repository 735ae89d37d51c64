//! PHP class writer.

use splice_core::domain::{ClassModel, MethodModel, ModuleIdentity};

use crate::config::RenderConfig;

/// Render one merged class.
pub fn render_class(module: &ModuleIdentity, class: &ClassModel, config: &RenderConfig) -> String {
    let unit = config.indent.unit();
    let mut out = String::from("<?php\n");

    if config.php_strict_types {
        out.push_str("declare(strict_types=1);\n");
    }

    let namespace = match class.package() {
        Some(package) => module.qualify(package),
        None => module.namespace(),
    };
    out.push_str(&format!("\nnamespace {namespace};\n\n"));

    write_docblock(&mut out, "", class.doc());
    out.push_str("class ");
    out.push_str(class.class_name());
    if let Some(parent) = class.parent() {
        out.push_str(" extends ");
        out.push_str(parent);
    }
    out.push_str("\n{\n");

    let mut first = true;
    for attribute in class.attributes() {
        if first {
            out.push('\n');
            first = false;
        }
        out.push_str(&unit);
        out.push_str(&attribute.declaration());
        out.push('\n');
    }

    for method in class.methods() {
        out.push('\n');
        write_method(&mut out, &unit, method);
    }

    out.push_str("}\n");
    out
}

fn write_method(out: &mut String, unit: &str, method: &MethodModel) {
    write_docblock(out, unit, method.doc());

    out.push_str(unit);
    out.push_str(method.visibility().as_str());
    if method.is_static() {
        out.push_str(" static");
    }
    out.push_str(" function ");
    out.push_str(method.name());

    match method.params() {
        [] => out.push_str("()\n"),
        [single] => {
            out.push('(');
            out.push_str(single);
            out.push_str(")\n");
        }
        many => {
            out.push_str("(\n");
            let inner = unit.repeat(2);
            out.push_str(&inner);
            out.push_str(&many.join(&format!(",\n{inner}")));
            out.push('\n');
        }
    }

    // Multi-line signatures keep the brace on the closing line.
    out.push_str(unit);
    out.push_str(if method.params().len() > 1 { ") {\n" } else { "{\n" });

    let body_indent = unit.repeat(2);
    for line in method.body().lines() {
        if !line.trim().is_empty() {
            out.push_str(&body_indent);
            out.push_str(line);
        }
        out.push('\n');
    }

    out.push_str(unit);
    out.push_str("}\n");
}

fn write_docblock(out: &mut String, pad: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    out.push_str(pad);
    out.push_str("/**\n");
    for line in lines {
        out.push_str(pad);
        if line.trim().is_empty() {
            out.push_str(" *\n");
        } else {
            out.push_str(" * ");
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out.push_str(pad);
    out.push_str(" */\n");
}
