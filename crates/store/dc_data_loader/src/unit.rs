/// Metric-name fragments and the unit they imply, checked in order; first match wins.
pub const UNIT_KEYWORDS: [(&str, &str); 14] = [
    ("温度", "℃"),
    ("湿度", "%"),
    ("功率", "MW"),
    ("出清曲线", "MW"),
    ("短期预测", "MW"),
    ("雨量", "mm"),
    ("降水", "mm"),
    ("电压", "V"),
    ("电流", "A"),
    ("压力", "Pa"),
    ("转速", "rpm"),
    ("风速", "m/s"),
    ("辐照度", "W/m²"),
    ("气压", "hPa"),
];

/// The contents of the first `(…)` or `（…）` in `name`, if there is one.
///
/// Either kind of closing bracket ends either kind of opening bracket.
pub fn parenthetical(name: &str) -> Option<&str> {
    let open = name.find(['(', '（'])?;
    let after_open = &name[open..];
    let inner_start = open + after_open.chars().next()?.len_utf8();
    let inner_len = name[inner_start..].find([')', '）'])?;
    Some(&name[inner_start..inner_start + inner_len])
}

/// The display unit for a metric name: an explicit parenthetical wins, then
/// [`UNIT_KEYWORDS`], then no unit at all.
///
/// ```
/// # use dc_data_loader::infer_unit;
/// assert_eq!(infer_unit("温度(°C)"), "°C");
/// assert_eq!(infer_unit("南宁温度"), "℃");
/// assert_eq!(infer_unit("SecretValue"), "");
/// ```
pub fn infer_unit(metric_name: &str) -> String {
    if let Some(unit) = parenthetical(metric_name) {
        return unit.to_owned();
    }

    UNIT_KEYWORDS
        .iter()
        .find(|(keyword, _)| metric_name.contains(*keyword))
        .map(|(_, unit)| (*unit).to_owned())
        .unwrap_or_default()
}

/// The metric name without its unit parenthetical, e.g. `温度(°C)` → `温度`.
pub fn base_metric_name(metric_name: &str) -> &str {
    match metric_name.find(['(', '（']) {
        Some(open) if parenthetical(metric_name).is_some() => metric_name[..open].trim_end(),
        _ => metric_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenthetical_wins() {
        assert_eq!(infer_unit("温度(°C)"), "°C");
        assert_eq!(infer_unit("相对湿度(%)"), "%");
        assert_eq!(infer_unit("10米风速(km/h)"), "km/h");
        assert_eq!(infer_unit("功率（kW）"), "kW");
        assert_eq!(infer_unit("功率(kW）"), "kW");
    }

    #[test]
    fn test_keywords() {
        assert_eq!(infer_unit("温度"), "℃");
        assert_eq!(infer_unit("相对湿度"), "%");
        assert_eq!(infer_unit("实时出清曲线"), "MW");
        assert_eq!(infer_unit("短期预测"), "MW");
        assert_eq!(infer_unit("降水量"), "mm");
        assert_eq!(infer_unit("母线电压"), "V");
        assert_eq!(infer_unit("发电机转速"), "rpm");
        assert_eq!(infer_unit("value"), "");
    }

    #[test]
    fn test_first_keyword_wins() {
        // Contains both "温度" and "湿度"; "温度" is earlier in the table.
        assert_eq!(infer_unit("温度湿度指数"), "℃");
    }

    #[test]
    fn test_unclosed_parenthesis_is_not_a_unit() {
        assert_eq!(parenthetical("温度(°C"), None);
        assert_eq!(infer_unit("温度(°C"), "℃");
        assert_eq!(base_metric_name("温度(°C"), "温度(°C");
    }

    #[test]
    fn test_base_metric_name() {
        assert_eq!(base_metric_name("温度(°C)"), "温度");
        assert_eq!(base_metric_name("功率 （MW）"), "功率");
        assert_eq!(base_metric_name("辐照度"), "辐照度");
    }
}
