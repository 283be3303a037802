//! List view artifact: a Tera template rendering the filter bar, the
//! item table, and the pager.
//!
//! Row selection posts combined keys (`a|b` for composite primaries) the
//! admin script splits back into the per-column arrays the delete
//! endpoint accepts — the same reserved separator the filters use.

use crate::domain::plan::{FilterParam, GenerationPlan, ListColumn};
use crate::domain::schema::TableSchema;

use super::SourceWriter;

pub fn emit_list_view(schema: &TableSchema, plan: &GenerationPlan) -> String {
    let entity = &schema.name;
    let pks = schema.primary_columns();
    let has_pk = !pks.is_empty();

    let mut w = SourceWriter::markup();

    w.line(format!(
        "{{# List view for `{entity}` — generated by admingen. #}}"
    ));
    w.blank();
    w.open("<div class=\"box\">");
    w.open("<div class=\"box-header with-border\">");
    w.line(format!("<h3 class=\"box-title\">{}</h3>", schema.label()));
    w.line("<a href=\"./add\" class=\"btn btn-success pull-right\">Add</a>");
    w.close("</div>");
    w.open("<div class=\"box-body\">");
    w.open("<div class=\"table-responsive\">");
    w.line("<form id=\"form_search\"><div id=\"div_filter\"></div></form>");
    w.open("<form id=\"form_list\" action=\"./del\" method=\"post\">");
    w.open("<table class=\"table table-bordered table-hover text-nowrap\">");

    // Header row.
    w.open("<tr>");
    if has_pk {
        w.line("<th scope=\"col\" style=\"width:2%;\"><input type=\"checkbox\" data-role=\"check-all\" /></th>");
    }
    for col in &plan.list_columns {
        let label = match col {
            ListColumn::Key {
                label, identity, ..
            } => {
                if *identity {
                    format!("{label}(identity)")
                } else {
                    label.clone()
                }
            }
            ListColumn::Reference { label, .. } | ListColumn::Scalar { label, .. } => label.clone(),
        };
        w.line(format!("<th scope=\"col\">{label}</th>"));
    }
    if has_pk {
        w.line("<th scope=\"col\" style=\"width:5%;\">&nbsp;</th>");
    }
    w.close("</tr>");

    // Body rows.
    w.open("<tbody>");
    w.line("{% for item in items %}");
    w.open("<tr>");
    if has_pk {
        let combined = pks
            .iter()
            .map(|pk| format!("{{{{ item.{} }}}}", pk.name))
            .collect::<Vec<_>>()
            .join("|");
        let key_names = pks
            .iter()
            .map(|pk| pk.name.as_str())
            .collect::<Vec<_>>()
            .join(",");
        w.line(format!(
            "<td><input type=\"checkbox\" name=\"__sel\" value=\"{combined}\" data-keys=\"{key_names}\" /></td>"
        ));
    }
    for col in &plan.list_columns {
        w.line(cell(col));
    }
    if has_pk {
        let query = pks
            .iter()
            .map(|pk| format!("{0}={{{{ item.{0} }}}}", pk.name))
            .collect::<Vec<_>>()
            .join("&");
        w.line(format!("<td><a href=\"./edit?{query}\">edit</a></td>"));
    }
    w.close("</tr>");
    w.line("{% endfor %}");
    w.close("</tbody>");

    w.close("</table>");
    w.close("</form>");
    if has_pk {
        w.line("<a id=\"btn_delete_sel\" href=\"#\" class=\"btn btn-danger pull-right\">Delete selected</a>");
    }
    w.line("<div id=\"pager\"></div>");
    w.close("</div>");
    w.close("</div>");
    w.close("</div>");
    w.blank();

    emit_filter_script(&mut w, plan);

    w.finish()
}

/// One table cell. Reference cells show the combined raw key plus the
/// resolved display text when the reference row is loaded.
fn cell(col: &ListColumn) -> String {
    match col {
        ListColumn::Key { column, .. } | ListColumn::Scalar { column, .. } => {
            format!("<td>{{{{ item.{column} }}}}</td>")
        }
        ListColumn::Reference {
            property,
            local_columns,
            display_column,
            ..
        } => {
            let raw = local_columns
                .iter()
                .map(|c| format!("{{{{ item.{c} }}}}"))
                .collect::<Vec<_>>()
                .join(",");
            match display_column {
                Some(display) => format!(
                    "<td>[{raw}] {{% if item.{property} %}}{{{{ item.{property}.{display} }}}}{{% endif %}}</td>"
                ),
                None => format!("<td>[{raw}]</td>"),
            }
        }
    }
}

/// Filter-bar configuration: one entry per relation filter, fed by the
/// option lists the controller put into the view context. Field names
/// here are the exact wire names the controller accepts.
fn emit_filter_script(w: &mut SourceWriter, plan: &GenerationPlan) {
    w.open("<script type=\"text/javascript\">");
    w.open("(function () {");
    w.open("var filters = [");
    for filter in &plan.filters {
        match filter {
            FilterParam::Scalar { name, .. } => {
                let field = plan
                    .reference_fields()
                    .find(|f| f.scalar_wire_name().as_deref() == Some(name))
                    .map(|f| (f.filter_label.clone(), f.context_var.clone()));
                if let Some((label, ctx_var)) = field {
                    w.line(format!(
                        "{{ name: '{label}', field: '{name}', choices: {{{{ {ctx_var} | json_encode() | safe }}}} }},"
                    ));
                }
            }
            FilterParam::Composite {
                property,
                components,
                ..
            } => {
                let field = plan
                    .reference_fields()
                    .find(|f| &f.property == property)
                    .map(|f| (f.filter_label.clone(), f.context_var.clone()));
                if let Some((label, ctx_var)) = field {
                    let fields = components
                        .iter()
                        .map(|c| c.name.as_str())
                        .collect::<Vec<_>>()
                        .join(",");
                    w.line(format!(
                        "{{ name: '{label}', field: '{fields}', combined: true, choices: {{{{ {ctx_var} | json_encode() | safe }}}} }},"
                    ));
                }
            }
            FilterParam::Association { name, property, .. } => {
                let assoc = plan.associations.iter().find(|a| &a.property == property);
                if let Some(assoc) = assoc {
                    w.line(format!(
                        "{{ name: '{}', field: '{name}', multiple: true, choices: {{{{ {} | json_encode() | safe }}}} }},",
                        assoc.label, assoc.context_var
                    ));
                }
            }
        }
    }
    w.close("];");
    w.line("initFilterBar(document.getElementById('div_filter'), filters);");
    w.line("initPager(document.getElementById('pager'), {{ count }}, {{ page }}, {{ limit }});");
    w.close("})();");
    w.close("</script>");
}
