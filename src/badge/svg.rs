use crate::badge::layout::BadgeLayout;
use crate::utils::markup::escape;

pub const LEFT_COLOR: &str = "#555";
pub const BADGE_HEIGHT: u32 = 20;

/// Flat two-segment badge.
pub fn render_svg(layout: &BadgeLayout) -> String {
    let total = layout.total_width;
    let left_width = layout.left_width;
    let right_width = layout.right_width;
    let left_center = layout.left_center;
    let right_center = layout.right_center;
    let left = escape(&layout.left_label);
    let right = escape(&layout.right_label);
    let color = layout.color;
    let height = BADGE_HEIGHT;

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{total}" height="{height}">
<linearGradient id="b" x2="0" y2="100%">
<stop offset="0" stop-color="#bbb" stop-opacity=".1"/>
<stop offset="1" stop-opacity=".1"/>
</linearGradient>
<mask id="a">
<rect width="{total}" height="{height}" rx="3" fill="#fff"/>
</mask>
<g mask="url(#a)">
<path fill="{LEFT_COLOR}" d="M0 0h{left_width}v{height}H0z"/>
<path fill="{color}" d="M{left_width} 0h{right_width}v{height}H{left_width}z"/>
<path fill="url(#b)" d="M0 0h{total}v{height}H0z"/>
</g>
<g fill="#fff" text-anchor="middle" font-family="DejaVu Sans,Verdana,Geneva,sans-serif" font-size="11">
<text x="{left_center}" y="15" fill="#010101" fill-opacity=".3">{left}</text>
<text x="{left_center}" y="14">{left}</text>
<text x="{right_center}" y="15" fill="#010101" fill-opacity=".3">{right}</text>
<text x="{right_center}" y="14">{right}</text>
</g>
</svg>
"##
    )
}
