use routing_slip_travel::travel_catalog;

pub(crate) fn run() {
    let catalog = travel_catalog();

    println!("Available activities:");
    for (name, activity) in catalog.iter() {
        println!("  {name}");
        println!("    work:         {}", activity.work_item_queue_address());
        println!("    compensation: {}", activity.compensation_queue_address());
    }
}
