//! Minimal browser form generated from the feature schema

use tabpredict_core::FeatureSchema;

const PAGE_HEAD: &str = r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8" />
  <title>Predictor</title>
  <style>
    body { font-family: system-ui,-apple-system,Segoe UI,Roboto,Arial,sans-serif;
           max-width: 820px; margin: 40px auto; padding: 0 16px; }
    .row { display:grid; grid-template-columns: 260px 1fr; gap:12px; align-items:center; margin:8px 0; }
    input { padding:8px; font-size:16px }
    button { padding:10px 14px; font-size:16px; cursor:pointer }
    pre { background:#f6f8fa; padding:12px; border-radius:8px; white-space:pre-wrap; }
  </style>
</head>
<body>
  <h1>Predictor</h1>
  <p>Enter values and click Predict.</p>
"#;

const PAGE_SCRIPT: &str = r#"
    const isNum = dt => ["int", "float", "number"].some(m => String(dt).toLowerCase().includes(m));

    document.getElementById('go').onclick = async () => {
      const row = {};
      for (const name of names) {
        const el = document.getElementById('f_' + name);
        if (isNum(dtypes[name] || '')) {
          const v = el.value.trim();
          row[name] = v === '' ? null : Number(v);
        } else {
          row[name] = el.value;
        }
      }
      const r = await fetch('/predict', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ rows: [row] })
      });
      const data = await r.json();
      document.getElementById('out').textContent = JSON.stringify(data, null, 2);
    };
"#;

/// Render the prediction form.
///
/// One input per schema column, in schema order: numeric dtypes get a
/// `number` input, everything else a `text` input. The page posts a one-row
/// batch to `/predict` and shows the JSON response.
pub fn render_form(schema: &FeatureSchema) -> String {
    let fields: Vec<String> = schema
        .names()
        .iter()
        .map(|name| {
            let escaped = escape_html(name);
            let input = if schema.is_numeric(name) {
                r#"type="number" step="any""#
            } else {
                r#"type="text""#
            };
            format!(
                r#"  <div class="row"><label for="f_{escaped}">{escaped}</label><input id="f_{escaped}" {input} /></div>"#
            )
        })
        .collect();

    let names = script_json(&serde_json::to_string(schema.names()).unwrap_or_else(|_| "[]".into()));
    let dtypes = script_json(&serde_json::to_string(schema.dtypes()).unwrap_or_else(|_| "{}".into()));

    let mut page = String::from(PAGE_HEAD);
    page.push_str(&fields.join("\n"));
    page.push_str("\n\n  <button id=\"go\">Predict</button>\n  <h3>Response</h3>\n  <pre id=\"out\">-</pre>\n\n  <script>\n");
    page.push_str(&format!("    const names = {names};\n    const dtypes = {dtypes};\n"));
    page.push_str(PAGE_SCRIPT);
    page.push_str("  </script>\n</body>\n</html>\n");
    page
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON is embedded in a `<script>` block; `</` must not close it early
fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}
