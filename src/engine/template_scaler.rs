// ==========================================
// 储备分配系统 - 模板缩放器
// ==========================================
// 职责: 将历史供应商托盘拆分按新需求等比缩放
// 算法: 最大余数法（Hamilton 分配），整数总量精确保持
// 红线: 纯函数，无状态，并列时按原拆分顺序裁决
// ==========================================

use crate::domain::types::SupplierSplit;

/// 整数四舍五入除法（半数进位），分母 ≤ 0 时返回 0
pub fn round_div(numerator: i64, denominator: i64) -> i64 {
    if denominator <= 0 {
        return 0;
    }
    (numerator + denominator / 2).div_euclid(denominator)
}

/// 实数取整（半数取偶），负数截为 0
pub fn round_quantity(value: f64) -> i64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.round_ties_even() as i64
}

// ==========================================
// TemplateScaler - 模板缩放器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateScaler;

impl TemplateScaler {
    pub fn new() -> Self {
        Self
    }

    /// 缩放历史拆分
    ///
    /// # 参数
    /// - `historical`: 历史拆分（供应商 → 托盘数，插入顺序有效）
    /// - `base_demand`: 历史需求（整数，缩放分母）
    /// - `new_demand`: 当前需求
    ///
    /// # 返回
    /// 缩放后的拆分；托盘数为 0 的供应商被移除，可能为空
    ///
    /// # 步骤
    /// 1. 当前需求取整为 0 或 base_demand ≤ 0 → 空
    /// 2. 目标总量 = round_div(历史总量 × 当前需求, base_demand)
    /// 3. 各供应商取整数部分，记录余数
    /// 4. 差额按余数降序逐个 +1（差额为负时按余数升序逐个 -1，不低于 0）
    pub fn scale(
        &self,
        historical: &SupplierSplit,
        base_demand: i64,
        new_demand: f64,
    ) -> SupplierSplit {
        let demand_int = round_quantity(new_demand);
        if demand_int == 0 || base_demand <= 0 {
            return SupplierSplit::new();
        }

        let total_old = historical.total();
        let desired_total = round_div(total_old * demand_int, base_demand);

        // (供应商, 缩放托盘数, 余数)
        let mut scaled: Vec<(i64, i64, i64)> = historical
            .iter()
            .map(|(supplier, pallets)| {
                let quotient = pallets * demand_int;
                (
                    supplier,
                    quotient.div_euclid(base_demand),
                    quotient.rem_euclid(base_demand),
                )
            })
            .collect();

        let floor_total: i64 = scaled.iter().map(|(_, p, _)| p).sum();
        let delta = desired_total - floor_total;

        if delta != 0 {
            let mut order: Vec<usize> = (0..scaled.len()).collect();
            // sort_by_key 为稳定排序，并列保持原顺序
            if delta > 0 {
                order.sort_by_key(|&i| std::cmp::Reverse(scaled[i].2));
                for &i in order.iter().take(delta as usize) {
                    scaled[i].1 += 1;
                }
            } else {
                order.sort_by_key(|&i| scaled[i].2);
                for &i in order.iter().take(delta.unsigned_abs() as usize) {
                    scaled[i].1 = (scaled[i].1 - 1).max(0);
                }
            }
        }

        scaled
            .into_iter()
            .filter(|(_, pallets, _)| *pallets > 0)
            .map(|(supplier, pallets, _)| (supplier, pallets))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(entries: &[(i64, i64)]) -> SupplierSplit {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_round_div() {
        assert_eq!(round_div(15, 10), 2); // 1.5 → 2
        assert_eq!(round_div(14, 10), 1);
        assert_eq!(round_div(5, 3), 2);
        assert_eq!(round_div(4, 3), 1);
        assert_eq!(round_div(7, 0), 0);
    }

    #[test]
    fn test_round_quantity_half_even() {
        assert_eq!(round_quantity(2.5), 2);
        assert_eq!(round_quantity(3.5), 4);
        assert_eq!(round_quantity(0.4), 0);
        assert_eq!(round_quantity(-3.0), 0);
        assert_eq!(round_quantity(f64::NAN), 0);
    }

    #[test]
    fn test_scale_preserves_total() {
        let scaler = TemplateScaler::new();
        let result = scaler.scale(&split(&[(1, 6), (2, 4)]), 10, 15.0);

        assert_eq!(result.total(), 15);
        assert_eq!(result.get(1), Some(9));
        assert_eq!(result.get(2), Some(6));
    }

    #[test]
    fn test_scale_rounds_to_empty() {
        let scaler = TemplateScaler::new();
        let result = scaler.scale(&split(&[(1, 1)]), 100, 0.4);
        assert!(result.is_empty());
    }

    #[test]
    fn test_scale_zero_base_demand() {
        let scaler = TemplateScaler::new();
        assert!(scaler.scale(&split(&[(1, 5)]), 0, 10.0).is_empty());
        assert!(scaler.scale(&split(&[(1, 5)]), -3, 10.0).is_empty());
    }

    #[test]
    fn test_tie_break_follows_split_order() {
        // 3 托盘 × 1/2 → 目标 round_div(3, 2) = 2，两家余数相同
        let scaler = TemplateScaler::new();
        let forward = scaler.scale(&split(&[(7, 1), (3, 1), (5, 1)]), 2, 1.0);
        assert_eq!(forward.total(), 2);
        assert_eq!(forward.iter().collect::<Vec<_>>(), vec![(7, 1), (3, 1)]);

        let reversed = scaler.scale(&split(&[(5, 1), (3, 1), (7, 1)]), 2, 1.0);
        assert_eq!(reversed.iter().collect::<Vec<_>>(), vec![(5, 1), (3, 1)]);

        // 重复执行结果一致
        for _ in 0..10 {
            assert_eq!(scaler.scale(&split(&[(7, 1), (3, 1), (5, 1)]), 2, 1.0), forward);
        }
    }

    #[test]
    fn test_largest_remainder_gets_extra() {
        // 总量 10 → 7：A 7×7/10=4.9, B 3×7/10=2.1 → 目标 7，floor 4+2=6，A 余数大
        let scaler = TemplateScaler::new();
        let result = scaler.scale(&split(&[(1, 7), (2, 3)]), 10, 7.0);
        assert_eq!(result.get(1), Some(5));
        assert_eq!(result.get(2), Some(2));
    }

    #[test]
    fn test_scale_down_drops_zero_suppliers() {
        let scaler = TemplateScaler::new();
        let result = scaler.scale(&split(&[(1, 9), (2, 1)]), 10, 2.0);
        // 目标 2：A 1.8 → 1 (余 8)，B 0.2 → 0 (余 2)，差额 1 给 A
        assert_eq!(result.iter().collect::<Vec<_>>(), vec![(1, 2)]);
    }
}
