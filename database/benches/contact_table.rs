use contactdb::{
    consts::consts::TransactionId,
    database::table::table::ContactTable,
    model::{contact::Contact, statement::Statement},
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const TABLE_SIZES: [usize; 3] = [100, 1_000, 10_000];

fn filled_table(size: usize) -> ContactTable {
    let mut table = ContactTable::new();

    for index in 0..size {
        let contact = Contact::new(
            format!("Contact {}", index),
            "081234567890".to_string(),
            format!("contact-{}@example.com", index),
        );

        table
            .apply(Statement::Add(contact), TransactionId(index + 1))
            .expect("names are unique");
    }

    table
}

pub fn contact_table_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("contact_table");

    for size in TABLE_SIZES.iter() {
        let mut table = filled_table(*size);

        group.throughput(Throughput::Elements(1));

        group.bench_with_input(BenchmarkId::new("get_by_name", size), size, |b, &size| {
            b.iter(|| {
                table.apply(
                    Statement::GetByName(format!("CONTACT {}", size / 2)),
                    TransactionId(size),
                )
            })
        });

        group.bench_with_input(BenchmarkId::new("list", size), size, |b, &size| {
            b.iter(|| table.apply(Statement::List, TransactionId(size)))
        });
    }

    group.finish();
}

criterion_group!(benches, contact_table_benchmark);
criterion_main!(benches);
