//! Chronological order of dynasties and regimes.
//!
//! The order is shared configuration: catalog sorting and the guessing
//! game's era verdicts both read it. Regimes that existed side by side
//! are listed roughly by founding date.

/// Dynasty and regime names, earliest first.
///
/// 前蜀 appears twice in the source table; lookups resolve to the first slot.
pub const ERA_ORDER: &[&str] = &[
    "秦", "西汉", "新", "东汉", "成汉", "曹魏", "蜀汉", "孙吴", "西晋", "前赵", "前燕", "前凉",
    "东晋", "后赵", "前秦", "冉魏", "前蜀", "后燕", "南燕", "西秦", "后秦", "后凉", "南凉", "北凉",
    "西凉", "北燕", "胡夏", "北魏", "南朝宋", "南齐", "南梁", "陈", "西魏", "东魏", "北齐", "北周",
    "隋", "唐", "武周", "吴越", "闽国", "南吴", "南楚", "前蜀", "后梁", "辽", "后唐", "南汉", "南平",
    "后蜀", "后晋", "南唐", "后汉", "后周", "北汉", "北宋", "西夏", "西辽", "金", "南宋", "蒙古",
    "元", "明", "清",
];

/// Position of `era` in [`ERA_ORDER`], if it is a known era.
pub fn era_index(era: &str) -> Option<usize> {
    let era = era.trim();
    ERA_ORDER.iter().position(|e| *e == era)
}

/// Sort key for catalog ordering: known eras by position, unknown eras after all of them.
pub fn era_sort_key(era: Option<&str>) -> usize {
    era.and_then(era_index).unwrap_or(ERA_ORDER.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_era_index_known() {
        assert_eq!(era_index("秦"), Some(0));
        assert_eq!(era_index("清"), Some(ERA_ORDER.len() - 1));
        assert!(era_index("唐") < era_index("北宋"));
    }

    #[test]
    fn test_era_index_trims_whitespace() {
        assert_eq!(era_index(" 唐 "), era_index("唐"));
    }

    #[test]
    fn test_duplicate_resolves_to_first() {
        assert_eq!(era_index("前蜀"), Some(16));
    }

    #[test]
    fn test_unknown_era_sorts_last() {
        assert_eq!(era_index("异域"), None);
        assert_eq!(era_sort_key(Some("异域")), ERA_ORDER.len());
        assert_eq!(era_sort_key(None), ERA_ORDER.len());
        assert!(era_sort_key(Some("清")) < era_sort_key(Some("异域")));
    }
}
