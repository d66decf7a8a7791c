//! # Leaderboard
//!
//! Orders stores and sellers for the ranking screen.
//!
//! ```text
//! StoreMetrics[] ──► rank_stores(by) ──► StoreRanking[]
//!                        │
//!                        ├── sort by metric, descending
//!                        ├── ties: store name, ascending
//!                        └── position 1.. → Badge
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{User, UserStatus};

/// Period figures for one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StoreMetrics {
    pub store_id: String,
    pub store_name: String,
    pub sales: Money,
    pub costs: Money,
    /// Customers served in the period.
    pub demand: u32,
    /// Sales target for the period.
    pub goal: Money,
    /// Growth over the previous period, in basis points (may be negative).
    pub growth_bps: i64,
    /// Operational efficiency score, in basis points.
    pub efficiency_bps: i64,
}

impl StoreMetrics {
    #[inline]
    pub fn profit(&self) -> Money {
        self.sales - self.costs
    }

    /// Sales over goal, in basis points. Zero without a goal.
    pub fn goal_attainment_bps(&self) -> i64 {
        self.sales.ratio_bps(self.goal)
    }

    pub fn met_goal(&self) -> bool {
        self.goal.is_positive() && self.sales >= self.goal
    }

    fn score(&self, by: RankBy) -> i64 {
        match by {
            RankBy::Sales => self.sales.cents(),
            RankBy::Profit => self.profit().cents(),
            RankBy::Demand => i64::from(self.demand),
            RankBy::Efficiency => self.efficiency_bps,
        }
    }
}

/// Metric the leaderboard is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    #[default]
    Sales,
    Profit,
    Demand,
    Efficiency,
}

impl std::str::FromStr for RankBy {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sales" | "vendas" => Ok(RankBy::Sales),
            "profit" | "lucro" => Ok(RankBy::Profit),
            "demand" | "demanda" => Ok(RankBy::Demand),
            "efficiency" | "eficiencia" | "eficiência" => Ok(RankBy::Efficiency),
            _ => Err(crate::error::ValidationError::NotAllowed {
                field: "ranking metric".to_string(),
                allowed: ["sales", "profit", "demand", "efficiency"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }),
        }
    }
}

/// Podium badge for a leaderboard position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Leader,
    RunnerUp,
    TopThree,
    Developing,
}

impl Badge {
    /// Badge for a 1-based position.
    pub fn for_position(position: usize) -> Self {
        match position {
            1 => Badge::Leader,
            2 => Badge::RunnerUp,
            3 => Badge::TopThree,
            _ => Badge::Developing,
        }
    }
}

/// One row of the store leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StoreRanking {
    /// 1-based.
    pub position: usize,
    pub badge: Badge,
    pub metrics: StoreMetrics,
}

/// Ranks stores by `by`, best first.
pub fn rank_stores(stores: &[StoreMetrics], by: RankBy) -> Vec<StoreRanking> {
    let mut sorted: Vec<&StoreMetrics> = stores.iter().collect();
    sorted.sort_by(|a, b| {
        b.score(by)
            .cmp(&a.score(by))
            .then_with(|| a.store_name.cmp(&b.store_name))
    });

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, metrics)| StoreRanking {
            position: i + 1,
            badge: Badge::for_position(i + 1),
            metrics: metrics.clone(),
        })
        .collect()
}

/// One row of the seller leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SellerRanking {
    pub position: usize,
    pub user_id: String,
    pub name: String,
    pub points: i64,
    pub monthly_sales: u32,
}

/// Ranks active users by points, then monthly sales, then name.
pub fn rank_sellers(users: &[User]) -> Vec<SellerRanking> {
    let mut active: Vec<&User> = users
        .iter()
        .filter(|u| u.status == UserStatus::Active)
        .collect();
    active.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.monthly_sales.cmp(&a.monthly_sales))
            .then_with(|| a.name.cmp(&b.name))
    });

    active
        .into_iter()
        .enumerate()
        .map(|(i, u)| SellerRanking {
            position: i + 1,
            user_id: u.id.clone(),
            name: u.name.clone(),
            points: u.points,
            monthly_sales: u.monthly_sales,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use chrono::NaiveDate;

    fn store(name: &str, sales: i64, costs: i64, demand: u32, efficiency_bps: i64) -> StoreMetrics {
        StoreMetrics {
            store_id: name.to_lowercase().replace(' ', "-"),
            store_name: name.to_string(),
            sales: Money::from_major_minor(sales, 0),
            costs: Money::from_major_minor(costs, 0),
            demand,
            goal: Money::from_major_minor(75000, 0),
            growth_bps: 0,
            efficiency_bps,
        }
    }

    fn stores() -> Vec<StoreMetrics> {
        vec![
            store("Loja Sul", 68200, 49800, 112, 8200),
            store("Loja Centro", 89500, 62300, 145, 9200),
            store("Loja Oeste", 54300, 41200, 89, 7600),
            store("Loja Norte", 76800, 54600, 128, 8800),
        ]
    }

    #[test]
    fn test_rank_by_sales() {
        let ranking = rank_stores(&stores(), RankBy::Sales);
        let names: Vec<_> = ranking.iter().map(|r| r.metrics.store_name.as_str()).collect();
        assert_eq!(names, vec!["Loja Centro", "Loja Norte", "Loja Sul", "Loja Oeste"]);

        assert_eq!(ranking[0].position, 1);
        assert_eq!(ranking[0].badge, Badge::Leader);
        assert_eq!(ranking[1].badge, Badge::RunnerUp);
        assert_eq!(ranking[2].badge, Badge::TopThree);
        assert_eq!(ranking[3].badge, Badge::Developing);
    }

    #[test]
    fn test_rank_by_profit() {
        let ranking = rank_stores(&stores(), RankBy::Profit);
        assert_eq!(ranking[0].metrics.profit(), Money::from_major_minor(27200, 0));
        assert_eq!(ranking[3].metrics.store_name, "Loja Oeste");
    }

    #[test]
    fn test_ties_broken_by_name() {
        let mut tied = stores();
        for s in &mut tied {
            s.efficiency_bps = 9000;
        }

        let ranking = rank_stores(&tied, RankBy::Efficiency);
        assert_eq!(ranking[0].metrics.store_name, "Loja Centro");
        assert_eq!(ranking[3].metrics.store_name, "Loja Sul");
    }

    #[test]
    fn test_goal_attainment() {
        let centro = store("Loja Centro", 89500, 62300, 145, 9200);
        assert_eq!(centro.goal_attainment_bps(), 11933);
        assert!(centro.met_goal());

        let mut no_goal = centro.clone();
        no_goal.goal = Money::zero();
        assert_eq!(no_goal.goal_attainment_bps(), 0);
        assert!(!no_goal.met_goal());
    }

    #[test]
    fn test_rank_sellers_skips_inactive() {
        let user = |name: &str, points: i64, status: UserStatus| User {
            id: name.to_lowercase(),
            name: name.to_string(),
            email: format!("{}@tiresaas.com", name.to_lowercase()),
            phone: String::new(),
            role: Role::Seller,
            store_id: None,
            status,
            monthly_sales: 10,
            points,
            joined_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            last_login: None,
        };

        let ranking = rank_sellers(&[
            user("Pedro", 1100, UserStatus::Active),
            user("Ana", 2000, UserStatus::Inactive),
            user("Maria", 1850, UserStatus::Active),
        ]);

        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].name, "Maria");
        assert_eq!(ranking[1].position, 2);
    }

    #[test]
    fn test_rank_by_parsing() {
        assert_eq!("lucro".parse::<RankBy>().unwrap(), RankBy::Profit);
        assert!("mood".parse::<RankBy>().is_err());
    }
}
