use rust_decimal::Decimal;
use serde::Serialize;

use super::product::Category;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_revenue: Decimal,
    pub total_orders: usize,
    pub product_count: usize,
    pub low_stock_count: usize,
    pub top_category: Option<Category>,
}

/// One point of the weekly revenue chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    pub name: &'static str,
    pub sales: u32,
}

pub const WEEKLY_SALES: [ChartPoint; 7] = [
    ChartPoint { name: "Mon", sales: 4000 },
    ChartPoint { name: "Tue", sales: 3000 },
    ChartPoint { name: "Wed", sales: 2000 },
    ChartPoint { name: "Thu", sales: 2780 },
    ChartPoint { name: "Fri", sales: 1890 },
    ChartPoint { name: "Sat", sales: 2390 },
    ChartPoint { name: "Sun", sales: 3490 },
];
