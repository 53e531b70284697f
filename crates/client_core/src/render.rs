use crate::table::PodTable;

pub fn render(table: &PodTable) -> String {
    let mut out = String::new();
    for (pod_name, containers) in table.iter() {
        out.push_str(r#"<div class="pod">"#);
        out.push_str(r#"<span class="podName">"#);
        push_escaped(&mut out, pod_name);
        out.push_str("</span>");
        for state in containers.values() {
            out.push_str(r#"<img src=""#);
            out.push_str(state.icon().asset_path());
            out.push_str(r#"">"#);
        }
        out.push_str("</div>");
    }
    out
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
}
