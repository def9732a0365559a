//! All examples in chapter order.

use crate::error::Error;
use crate::problems::allocation::{Portfolio, ResourceAllocation};
use crate::problems::blending::{Diet, FeedMix};
use crate::problems::cutting::{BinPacking, CuttingStock};
use crate::problems::network::ShortestPath;
use crate::problems::production::{
    ExclusiveProduction, FixedCost, IntegerProduction, LotSizing, MultiPeriod,
};
use crate::problems::scheduling::{Assignment, ShiftScheduling};
use crate::problems::selection::{Knapsack, ProjectSelection};
use crate::problems::transport::{FacilityLocation, Transportation};
use crate::problems::two_variable::TwoVariableLp;
use crate::problems::{Chapter, Example};

/// Every example with its textbook data, ordered by chapter and number.
pub fn catalog() -> Vec<Box<dyn Example>> {
    vec![
        Box::new(TwoVariableLp::basic_max()),
        Box::new(TwoVariableLp::basic_min()),
        Box::new(TwoVariableLp::with_equality()),
        Box::new(ResourceAllocation::default()),
        Box::new(FeedMix::default()),
        Box::new(Transportation::default()),
        Box::new(Portfolio::default()),
        Box::new(IntegerProduction::default()),
        Box::new(ProjectSelection::default()),
        Box::new(ExclusiveProduction::default()),
        Box::new(FixedCost::default()),
        Box::new(FacilityLocation::default()),
        Box::new(LotSizing::default()),
        Box::new(MultiPeriod::default()),
        Box::new(Diet::default()),
        Box::new(Knapsack::default()),
        Box::new(ShiftScheduling::default()),
        Box::new(Assignment::default()),
        Box::new(CuttingStock::default()),
        Box::new(ShortestPath::default()),
        Box::new(BinPacking::default()),
    ]
}

/// Looks an example up by its id.
pub fn find(id: &str) -> Result<Box<dyn Example>, Error> {
    catalog()
        .into_iter()
        .find(|e| e.id() == id)
        .ok_or_else(|| Error::UnknownExample(id.to_string()))
}

/// The examples of chapter `number` (3, 4 or 5).
pub fn by_chapter(number: u8) -> Result<Vec<Box<dyn Example>>, Error> {
    let chapter = Chapter::from_number(number)?;
    Ok(catalog()
        .into_iter()
        .filter(|e| e.chapter() == chapter)
        .collect())
}
