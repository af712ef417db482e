use super::model::{CreateTaskPayload, Priority, Task, UpdateTaskPayload};
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use std::collections::HashMap;

/// Load every task in a user's partition (pure domain logic, no transport)
pub async fn load_tasks_for_user(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
) -> Result<Vec<Task>, String> {
    let pk = format!("USER#{}", user_id);

    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S(pk))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("TASK#".to_string()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB query error: {}", e))?;

    let mut tasks = Vec::new();
    for item in result.items() {
        if let Some(sk) = item.get("SK").and_then(|v| v.as_s().ok()) {
            if let Some(task_id) = sk.strip_prefix("TASK#") {
                let task = Task {
                    task_id: task_id.to_string(),
                    user_id: user_id.to_string(),
                    title: item
                        .get("title")
                        .and_then(|v| v.as_s().ok())
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                    description: item
                        .get("description")
                        .and_then(|v| v.as_s().ok())
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                    due_date: item
                        .get("dueDate")
                        .and_then(|v| v.as_s().ok())
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                    priority: item
                        .get("priority")
                        .and_then(|v| v.as_s().ok())
                        .and_then(|s| Priority::parse(s))
                        .unwrap_or_default(),
                    completed: item
                        .get("completed")
                        .and_then(|v| v.as_bool().ok())
                        .copied()
                        .unwrap_or(false),
                    created_at: item
                        .get("createdAt")
                        .and_then(|v| v.as_s().ok())
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                    updated_at: item
                        .get("updatedAt")
                        .and_then(|v| v.as_s().ok())
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                };
                tasks.push(task);
            }
        }
    }

    Ok(tasks)
}

/// Create a new task owned by the given user
pub async fn create_task(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    payload: CreateTaskPayload,
) -> Result<Task, String> {
    let task_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let pk = format!("USER#{}", user_id);
    let sk = format!("TASK#{}", task_id);

    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S(pk))
        .item("SK", AttributeValue::S(sk))
        .item("title", AttributeValue::S(payload.title.clone()))
        .item("description", AttributeValue::S(payload.description.clone()))
        .item("dueDate", AttributeValue::S(payload.due_date.clone()))
        .item("priority", AttributeValue::S(payload.priority.as_str().to_string()))
        .item("completed", AttributeValue::Bool(payload.completed))
        .item("createdAt", AttributeValue::S(now.clone()))
        .item("updatedAt", AttributeValue::S(now.clone()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB put_item error: {}", e))?;

    Ok(Task {
        task_id,
        user_id: user_id.to_string(),
        title: payload.title,
        description: payload.description,
        due_date: payload.due_date,
        priority: payload.priority,
        completed: payload.completed,
        created_at: now.clone(),
        updated_at: now,
    })
}

/// Get a specific task from a user's partition
pub async fn get_task(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    task_id: &str,
) -> Result<Task, String> {
    let pk = format!("USER#{}", user_id);
    let sk = format!("TASK#{}", task_id);

    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(pk))
        .key("SK", AttributeValue::S(sk))
        .send()
        .await
        .map_err(|e| format!("DynamoDB get_item error: {}", e))?;

    if let Some(item) = result.item() {
        Ok(Task {
            task_id: task_id.to_string(),
            user_id: user_id.to_string(),
            title: item
                .get("title")
                .and_then(|v| v.as_s().ok())
                .map(|s| s.to_string())
                .unwrap_or_default(),
            description: item
                .get("description")
                .and_then(|v| v.as_s().ok())
                .map(|s| s.to_string())
                .unwrap_or_default(),
            due_date: item
                .get("dueDate")
                .and_then(|v| v.as_s().ok())
                .map(|s| s.to_string())
                .unwrap_or_default(),
            priority: item
                .get("priority")
                .and_then(|v| v.as_s().ok())
                .and_then(|s| Priority::parse(s))
                .unwrap_or_default(),
            completed: item
                .get("completed")
                .and_then(|v| v.as_bool().ok())
                .copied()
                .unwrap_or(false),
            created_at: item
                .get("createdAt")
                .and_then(|v| v.as_s().ok())
                .map(|s| s.to_string())
                .unwrap_or_default(),
            updated_at: item
                .get("updatedAt")
                .and_then(|v| v.as_s().ok())
                .map(|s| s.to_string())
                .unwrap_or_default(),
        })
    } else {
        Err("Task not found".to_string())
    }
}

/// Update a task's editable fields; updatedAt is refreshed on every call
pub async fn update_task(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    task_id: &str,
    payload: UpdateTaskPayload,
) -> Result<Task, String> {
    let pk = format!("USER#{}", user_id);
    let sk = format!("TASK#{}", task_id);
    let now = chrono::Utc::now().to_rfc3339();

    let mut update_expr = vec![];
    let mut expr_names = HashMap::new();
    let mut expr_values = HashMap::new();

    if let Some(title) = payload.title {
        update_expr.push("#title = :title");
        expr_names.insert("#title".to_string(), "title".to_string());
        expr_values.insert(":title".to_string(), AttributeValue::S(title));
    }

    if let Some(description) = payload.description {
        update_expr.push("#description = :description");
        expr_names.insert("#description".to_string(), "description".to_string());
        expr_values.insert(":description".to_string(), AttributeValue::S(description));
    }

    if let Some(due_date) = payload.due_date {
        update_expr.push("#dueDate = :dueDate");
        expr_names.insert("#dueDate".to_string(), "dueDate".to_string());
        expr_values.insert(":dueDate".to_string(), AttributeValue::S(due_date));
    }

    if let Some(priority) = payload.priority {
        update_expr.push("#priority = :priority");
        expr_names.insert("#priority".to_string(), "priority".to_string());
        expr_values.insert(
            ":priority".to_string(),
            AttributeValue::S(priority.as_str().to_string()),
        );
    }

    if let Some(completed) = payload.completed {
        update_expr.push("#completed = :completed");
        expr_names.insert("#completed".to_string(), "completed".to_string());
        expr_values.insert(":completed".to_string(), AttributeValue::Bool(completed));
    }

    // Every mutation refreshes updatedAt, even a no-field edit
    update_expr.push("#updatedAt = :updatedAt");
    expr_names.insert("#updatedAt".to_string(), "updatedAt".to_string());
    expr_values.insert(":updatedAt".to_string(), AttributeValue::S(now));

    let update_expression = format!("SET {}", update_expr.join(", "));

    let mut builder = client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(pk))
        .key("SK", AttributeValue::S(sk))
        .update_expression(update_expression);

    for (k, v) in expr_names {
        builder = builder.expression_attribute_names(k, v);
    }

    for (k, v) in expr_values {
        builder = builder.expression_attribute_values(k, v);
    }

    builder
        .send()
        .await
        .map_err(|e| format!("DynamoDB update_item error: {}", e))?;

    get_task(client, table_name, user_id, task_id).await
}

/// Flip a task's completed flag.
/// Read-then-write with no version check: concurrent toggles race last-write-wins.
pub async fn toggle_complete(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    task_id: &str,
) -> Result<Task, String> {
    let task = get_task(client, table_name, user_id, task_id).await?;
    let now = chrono::Utc::now().to_rfc3339();
    let pk = format!("USER#{}", user_id);
    let sk = format!("TASK#{}", task_id);

    client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(pk))
        .key("SK", AttributeValue::S(sk))
        .update_expression("SET #completed = :completed, #updatedAt = :updatedAt")
        .expression_attribute_names("#completed", "completed")
        .expression_attribute_names("#updatedAt", "updatedAt")
        .expression_attribute_values(":completed", AttributeValue::Bool(!task.completed))
        .expression_attribute_values(":updatedAt", AttributeValue::S(now))
        .send()
        .await
        .map_err(|e| format!("DynamoDB update_item error: {}", e))?;

    get_task(client, table_name, user_id, task_id).await
}

/// Delete a task
pub async fn delete_task(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    task_id: &str,
) -> Result<(), String> {
    client
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(format!("USER#{}", user_id)))
        .key("SK", AttributeValue::S(format!("TASK#{}", task_id)))
        .send()
        .await
        .map_err(|e| format!("DynamoDB delete_item error: {}", e))?;

    Ok(())
}
