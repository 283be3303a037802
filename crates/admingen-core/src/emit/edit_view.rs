//! Edit view artifact: a Tera template serving both create mode (no
//! `item` in the context) and edit mode (existing `item` present).
//!
//! Field rows follow the plan order — keys, references, remaining
//! scalars, association multi-selects — and the input *names* are the
//! plan's wire names, so a round-trip through the controller binds
//! without translation.

use crate::domain::plan::{
    AssociationSpec, ColumnField, FieldControl, FormField, GenerationPlan, ReferenceField,
};
use crate::domain::schema::TableSchema;

use super::SourceWriter;

pub fn emit_edit_view(schema: &TableSchema, plan: &GenerationPlan) -> String {
    let entity = &schema.name;
    let mut w = SourceWriter::markup();

    w.line(format!(
        "{{# Edit view for `{entity}` — generated by admingen. #}}"
    ));
    w.blank();
    w.open("<div class=\"box\">");
    w.open("<div class=\"box-header with-border\">");
    w.line(format!(
        "<h3 class=\"box-title\">{{% if item %}}Update{{% else %}}Add{{% endif %}} {}</h3>",
        schema.label()
    ));
    w.close("</div>");
    w.open("<div class=\"box-body\">");
    w.open("<div class=\"table-responsive\">");
    w.open("<form id=\"form_edit\" method=\"post\" action=\"{% if item %}./edit{% else %}./add{% endif %}\">");
    w.open("<table class=\"table table-bordered table-hover\">");

    for field in &plan.fields {
        match field {
            FormField::Key(col) => emit_key_row(&mut w, col),
            FormField::Reference(reference) => emit_reference_row(&mut w, reference),
            FormField::Scalar(col) => emit_scalar_row(&mut w, col),
            FormField::MultiSelect(assoc) => emit_multiselect_row(&mut w, assoc),
        }
    }

    w.open("<tr>");
    w.line("<td width=\"8%\">&nbsp;</td>");
    w.line("<td><input type=\"submit\" value=\"{% if item %}Update{% else %}Add{% endif %}\" />&nbsp;<input type=\"button\" value=\"Cancel\" data-role=\"cancel\" /></td>");
    w.close("</tr>");

    w.close("</table>");
    w.close("</form>");
    w.close("</div>");
    w.close("</div>");
    w.close("</div>");
    w.blank();

    emit_script(&mut w, plan);

    w.finish()
}

/// Primary-key row. Store-assigned keys (identity / uuid) appear only in
/// edit mode, read-only — they still post so the update can locate the
/// row. Author-supplied keys render like any other control.
fn emit_key_row(w: &mut SourceWriter, col: &ColumnField) {
    if col.read_only {
        w.line("{% if item %}");
        w.open("<tr>");
        w.line(format!("<td>{}(identity)</td>", col.label));
        w.line(format!(
            "<td><input name=\"{0}\" type=\"text\" readonly value=\"{{{{ item.{0} }}}}\" style=\"width:20%;background-color:#ddd;\" /></td>",
            col.column
        ));
        w.close("</tr>");
        w.line("{% endif %}");
    } else {
        emit_scalar_row(w, col);
    }
}

fn emit_scalar_row(w: &mut SourceWriter, col: &ColumnField) {
    w.open("<tr>");
    w.line(format!("<td>{}</td>", col.label));
    match &col.control {
        FieldControl::Checkbox => {
            w.line(format!(
                "<td id=\"{0}_td\"><input name=\"{0}\" type=\"checkbox\" value=\"true\" /></td>",
                col.column
            ));
        }
        FieldControl::NumberMasked => {
            w.line(format!(
                "<td><input name=\"{}\" type=\"text\" class=\"form-control\" data-inputmask=\"'mask': '9', 'repeat': 9, 'greedy': false\" data-mask style=\"width:200px;\" /></td>",
                col.column
            ));
        }
        FieldControl::CurrencyMasked => {
            w.open("<td>");
            w.open("<div class=\"input-group\" style=\"width:200px;\">");
            w.line("<span class=\"input-group-addon\">$</span>");
            w.line(format!(
                "<input name=\"{}\" type=\"text\" class=\"form-control\" data-inputmask=\"'mask': '9', 'repeat': 10, 'greedy': false\" data-mask />",
                col.column
            ));
            w.line("<span class=\"input-group-addon\">.00</span>");
            w.close("</div>");
            w.close("</td>");
        }
        FieldControl::DatePicker { audit } => {
            if *audit {
                w.line(format!(
                    "<td><input name=\"{}\" type=\"text\" class=\"datepicker\" readonly style=\"width:20%;background-color:#ddd;\" /></td>",
                    col.column
                ));
            } else {
                w.line(format!(
                    "<td><input name=\"{}\" type=\"text\" class=\"datepicker\" /></td>",
                    col.column
                ));
            }
        }
        FieldControl::EnumSelect { variants, multiple } => {
            w.open("<td>");
            if *multiple {
                w.open(format!(
                    "<select name=\"{}\" class=\"form-control select2\" multiple>",
                    col.column
                ));
            } else {
                w.open(format!("<select name=\"{}\">", col.column));
                w.line("<option value=\"\">------</option>");
            }
            for variant in variants {
                w.line(format!("<option value=\"{variant}\">{variant}</option>"));
            }
            w.close("</select>");
            w.close("</td>");
        }
        FieldControl::TextWithUpload => {
            w.open("<td>");
            w.line(format!(
                "<input name=\"{}\" type=\"text\" class=\"form-control\" style=\"width:60%;\" />",
                col.column
            ));
            w.line(format!("<input name=\"{}_file\" type=\"file\" />", col.column));
            w.close("</td>");
        }
        FieldControl::MultiLine => {
            w.line(format!(
                "<td><textarea name=\"{}\" style=\"width:100%;height:100px;\"></textarea></td>",
                col.column
            ));
        }
        FieldControl::Text => {
            w.line(format!(
                "<td><input name=\"{}\" type=\"text\" class=\"form-control\" style=\"width:60%;\" /></td>",
                col.column
            ));
        }
    }
    w.close("</tr>");
}

/// Reference row: a flat dropdown over the referenced instances, or —
/// for self-references — an empty cell the tree-selector script fills.
fn emit_reference_row(w: &mut SourceWriter, field: &ReferenceField) {
    w.open("<tr>");
    w.line(format!("<td>{}</td>", field.row_label));
    if field.hierarchical {
        w.line(format!("<td id=\"{}_td\"></td>", field.property));
    } else {
        w.open("<td>");
        w.open(format!("<select name=\"{}\">", field.input_name));
        w.line("<option value=\"\">------</option>");
        w.line(format!(
            "{{% for fk in {} %}}<option value=\"{{{{ fk.value }}}}\">{{{{ fk.text }}}}</option>{{% endfor %}}",
            field.context_var
        ));
        w.close("</select>");
        w.close("</td>");
    }
    w.close("</tr>");
}

/// Association multi-select, preselected from `item_mn_<property>` in
/// edit mode.
fn emit_multiselect_row(w: &mut SourceWriter, assoc: &AssociationSpec) {
    w.open("<tr>");
    w.line(format!("<td>{}</td>", assoc.property));
    w.open("<td>");
    w.open(format!(
        "<select name=\"{}\" class=\"form-control select2\" multiple data-placeholder=\"Select a {}\">",
        assoc.param, assoc.target
    ));
    w.line(format!(
        "{{% for mn in {ctx} %}}<option value=\"{{{{ mn.value }}}}\"{{% if item and mn.value in item_{ctx} %}} selected{{% endif %}}>{{{{ mn.text }}}}</option>{{% endfor %}}",
        ctx = assoc.context_var
    ));
    w.close("</select>");
    w.close("</td>");
    w.close("</tr>");
}

fn emit_script(w: &mut SourceWriter, plan: &GenerationPlan) {
    w.open("<script type=\"text/javascript\">");
    w.open("(function () {");
    w.line("var form = document.getElementById('form_edit');");

    for field in plan.reference_fields().filter(|f| f.hierarchical) {
        w.line(format!(
            "initTreeSelect(document.getElementById('{}_td'), {{{{ {} | json_encode() | safe }}}}, '{}');",
            field.property, field.context_var, field.input_name
        ));
    }

    w.line("{% if item %}");
    w.line("fillForm(form, {{ item | json_encode() | safe }});");
    w.line("{% endif %}");
    w.close("})();");
    w.close("</script>");
}
