//! Markdown summary writer.

use splice_core::domain::{DocContribution, ModuleIdentity};

/// Module title, then every summary, then the specification and
/// configuration sections. Contributions keep invocation order; empty
/// sections are left out.
pub fn render_summary(module: &ModuleIdentity, docs: &[DocContribution]) -> String {
    let mut out = format!("# {}\n", module.module_name());

    let summaries = collect(docs, |d| d.summary.as_deref());
    if !summaries.is_empty() {
        out.push('\n');
        out.push_str(&summaries.join("\n\n"));
        out.push('\n');
    }

    for (title, section) in [
        ("Specifications", collect(docs, |d| d.specifications.as_deref())),
        ("Configuration", collect(docs, |d| d.configuration.as_deref())),
    ] {
        if section.is_empty() {
            continue;
        }
        out.push_str(&format!("\n## {title}\n\n"));
        out.push_str(&section.join("\n"));
        out.push('\n');
    }

    out
}

fn collect<'a>(
    docs: &'a [DocContribution],
    field: impl Fn(&'a DocContribution) -> Option<&'a str>,
) -> Vec<&'a str> {
    docs.iter()
        .filter_map(field)
        .map(|text| text.trim_end_matches('\n'))
        .filter(|text| !text.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module() -> ModuleIdentity {
        ModuleIdentity::new("Mage2gen", "Shop").unwrap()
    }

    #[test]
    fn title_only_when_nothing_documented() {
        assert_eq!(render_summary(&module(), &[]), "# Mage2gen_Shop\n");
    }

    #[test]
    fn sections_keep_invocation_order() {
        let docs = [
            DocContribution::new()
                .summary("Adds storefront pages.")
                .specifications(" - Controller\n\t- frontend > shop/index/index"),
            DocContribution::new().specifications(" - Controller\n\t- frontend > shop/cart/view"),
            DocContribution::new()
                .specifications(" - Payment Method\n\t- Invoice")
                .configuration(" - Enabled (payment/invoice/active)"),
        ];

        let expected = concat!(
            "# Mage2gen_Shop\n",
            "\n",
            "Adds storefront pages.\n",
            "\n",
            "## Specifications\n",
            "\n",
            " - Controller\n",
            "\t- frontend > shop/index/index\n",
            " - Controller\n",
            "\t- frontend > shop/cart/view\n",
            " - Payment Method\n",
            "\t- Invoice\n",
            "\n",
            "## Configuration\n",
            "\n",
            " - Enabled (payment/invoice/active)\n",
        );
        assert_eq!(render_summary(&module(), &docs), expected);
    }

    #[test]
    fn blank_entries_are_skipped() {
        let docs = [DocContribution::new().configuration("  ").summary("Hello")];
        let md = render_summary(&module(), &docs);
        assert!(!md.contains("## Configuration"));
        assert!(md.ends_with("\nHello\n"));
    }
}
