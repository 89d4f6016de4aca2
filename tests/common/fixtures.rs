use serde_json::{Value, json};
use xslmap::MappingSet;

/// Build a mapping set from the JSON shape the editor produces
pub fn mapping_set(value: Value) -> MappingSet {
    serde_json::from_value(value).expect("fixture is a valid mapping set")
}

/// A single attribute mapped to a top-level element
pub fn employee_id() -> MappingSet {
    mapping_set(json!({
        "fields": [
            { "sourcePath": "Company/Employee/@id", "targetName": "empId" }
        ]
    }))
}

/// A repeated currency field for flat output
pub fn repeated_prices() -> MappingSet {
    mapping_set(json!({
        "recordPath": "Order",
        "fields": [
            { "sourcePath": "Order/Line/Price", "targetName": "Name", "fieldType": "currency", "occurs": 3 }
        ]
    }))
}

/// A variable referenced from an attribute
pub fn language_variable() -> MappingSet {
    mapping_set(json!({
        "variables": [ { "name": "Lang", "value": "en-US" } ],
        "fields": [
            {
                "sourcePath": "Doc/Title",
                "targetName": "Title",
                "attributes": [ { "name": "lang", "value": "Lang", "isVariable": true } ]
            }
        ]
    }))
}

/// Two siblings whose shared parent is never declared
pub fn siblings_without_parent() -> MappingSet {
    mapping_set(json!({
        "fields": [
            { "sourcePath": "R/B", "targetName": "b", "targetPath": "a/b" },
            { "sourcePath": "R/C", "targetName": "c", "targetPath": "a/c" }
        ]
    }))
}

/// A realistic directory export touching every feature
pub fn employee_directory() -> MappingSet {
    mapping_set(json!({
        "rootPath": "/Company",
        "recordPath": "Employee",
        "xsltVersion": "1.0",
        "rootElement": {
            "name": "Directory",
            "attributes": [
                { "name": "lang", "value": "Lang", "isVariable": true },
                { "name": "generated", "xpath": "count(//Employee)" }
            ]
        },
        "variables": [
            { "name": "Lang", "value": "en-US" },
            { "name": "Total", "xpath": "count(//Employee)" }
        ],
        "fields": [
            { "sourcePath": "data.xml/Company.Name", "targetName": "Company", "targetPath": "Header/Company" },
            { "sourcePath": "Company/Source", "targetName": "Source", "targetPath": "Header/Source",
              "valueType": "hardcoded", "hardcodedValue": "HR export" },
            { "sourcePath": "Company/Employee", "targetName": "Employee", "targetPath": "Staff/Employee",
              "fieldType": "component", "occurs": 50,
              "attributes": [ { "name": "kind", "value": "person", "isHardcoded": true } ] },
            { "sourcePath": "Company/Employee/@id", "sourceType": "attribute", "targetName": "Id",
              "targetPath": "Staff/Employee/Id" },
            { "sourcePath": "Company/Employee/Name", "targetName": "Name", "targetPath": "Staff/Employee/Name" },
            { "sourcePath": "Company/Employee/HireDate", "targetName": "HireDate",
              "targetPath": "Staff/Employee/HireDate", "fieldType": "date" },
            { "sourcePath": "Company/Employee/Salary", "targetName": "Salary",
              "targetPath": "Staff/Employee/Salary", "fieldType": "currency", "required": false },
            { "sourcePath": "Company/Employee/Note", "targetName": "Note",
              "targetPath": "Staff/Employee/Note", "valueType": "empty" }
        ]
    }))
}
