pub mod order;
pub mod plan;
pub mod rolling_scheduler;

pub use order::Order;
pub use plan::{
    allocate_costs, build_plan, merit_order, multi_batch_schedule, plan_dispatch,
    priority_dispatch, queue_pressure, schedule_dispatch, split_dispatch, weighted_dispatch,
    GenerationUnit, Window,
};
pub use rolling_scheduler::RollingWindowScheduler;
