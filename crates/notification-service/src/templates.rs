use watch_core::{Direction, TriggerEvent};

pub struct EmailTemplate;

impl EmailTemplate {
    pub fn render(event: &TriggerEvent) -> String {
        let symbol = event.condition.symbol.to_uppercase();
        let (header_color, direction_label) = match event.condition.direction {
            Direction::Above => ("#22c55e", "above"),
            Direction::Below => ("#ef4444", "below"),
        };

        format!(
            r#"<div style="font-family:Arial,sans-serif;max-width:520px;margin:0 auto;border:1px solid #e2e8f0;border-radius:8px;overflow:hidden;">
<div style="background:{header_color};color:#fff;padding:12px 20px;font-size:18px;font-weight:700;">PRICE ALERT &mdash; {symbol}</div>
<table style="width:100%;border-collapse:collapse;">
  <tr><td style="padding:8px 12px;color:#94a3b8;">Symbol</td><td style="padding:8px 12px;font-weight:600;">{symbol}</td></tr>
  <tr style="background:#f8fafc;"><td style="padding:8px 12px;color:#94a3b8;">Current Price</td><td style="padding:8px 12px;font-weight:600;">${price}</td></tr>
  <tr><td style="padding:8px 12px;color:#94a3b8;">Threshold</td><td style="padding:8px 12px;font-weight:600;">{direction_label} ${threshold}</td></tr>
  <tr style="background:#f8fafc;"><td style="padding:8px 12px;color:#94a3b8;">Triggered At</td><td style="padding:8px 12px;font-weight:600;">{triggered_at}</td></tr>
</table>
<div style="padding:12px 20px;color:#64748b;font-size:12px;">This alert fired once and is now disabled. Create a new condition to re-arm it.</div>
</div>"#,
            price = event.price_at_trigger,
            threshold = event.condition.threshold,
            triggered_at = event.timestamp.to_rfc3339(),
        )
    }
}
